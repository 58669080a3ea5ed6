use crate::php::{NodeId, PhpError, Result, Value};

/// Arena-owned value tree produced by one decode.
///
/// Composite nodes own their children through [`NodeId`] handles that always
/// point forward in the arena, so ownership forms a tree. Only
/// [`Value::Reference`] may point backward, including at an ancestor.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<Value>,
	root: NodeId,
}

impl Document {
	/// Root node handle.
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Number of nodes in the arena.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the arena is empty. Never true for a finished document.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Look up a node.
	pub fn get(&self, id: NodeId) -> Option<&Value> {
		self.nodes.get(id.index())
	}

	/// Look up a node, treating a missing one as a dangling reference.
	pub fn resolve(&self, id: NodeId) -> Result<&Value> {
		self.get(id).ok_or_else(|| PhpError::DanglingReference { target: format!("node {id}") })
	}
}

/// Incremental arena builder.
///
/// Composite parents are [`reserve`](Self::reserve)d before their children
/// and [`fill`](Self::fill)ed afterwards, which is also how a reference to an
/// enclosing, still-open array is expressed.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
	nodes: Vec<Option<Value>>,
}

impl DocumentBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of allocated (reserved or filled) nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether nothing has been allocated.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Append a finished node.
	pub fn push(&mut self, value: Value) -> NodeId {
		let id = NodeId::from_index(self.nodes.len());
		self.nodes.push(Some(value));
		id
	}

	/// Allocate a handle whose value is supplied later.
	pub fn reserve(&mut self) -> NodeId {
		let id = NodeId::from_index(self.nodes.len());
		self.nodes.push(None);
		id
	}

	/// Supply the value of a reserved handle.
	pub fn fill(&mut self, id: NodeId, value: Value) -> Result<()> {
		let Some(slot) = self.nodes.get_mut(id.index()) else {
			return Err(PhpError::MalformedTree {
				node: id,
				reason: "node was never reserved",
			});
		};
		if slot.is_some() {
			return Err(PhpError::MalformedTree {
				node: id,
				reason: "node filled twice",
			});
		}

		*slot = Some(value);
		Ok(())
	}

	/// Validate ownership and freeze the arena.
	pub fn finish(self, root: NodeId) -> Result<Document> {
		let mut nodes = Vec::with_capacity(self.nodes.len());
		for (index, slot) in self.nodes.into_iter().enumerate() {
			let Some(value) = slot else {
				return Err(PhpError::MalformedTree {
					node: NodeId::from_index(index),
					reason: "reserved node was never filled",
				});
			};
			nodes.push(value);
		}

		if root.index() >= nodes.len() {
			return Err(PhpError::MalformedTree {
				node: root,
				reason: "root handle out of range",
			});
		}

		let mut owned = vec![false; nodes.len()];
		for (index, value) in nodes.iter().enumerate() {
			let parent = NodeId::from_index(index);
			for child in value.children() {
				if child.index() >= nodes.len() {
					return Err(PhpError::MalformedTree {
						node: child,
						reason: "child handle out of range",
					});
				}
				if child <= parent {
					return Err(PhpError::MalformedTree {
						node: child,
						reason: "child does not follow its parent",
					});
				}
				if std::mem::replace(&mut owned[child.index()], true) {
					return Err(PhpError::MalformedTree {
						node: child,
						reason: "node owned by more than one composite",
					});
				}
			}
		}

		Ok(Document { nodes, root })
	}
}
