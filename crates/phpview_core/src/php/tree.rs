use crate::php::{AccessModifier, Document, Key, NodeId, Result, TypeTag, Value, property_info};

/// Display-ready node, independent of any UI toolkit.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TreeNode {
	/// Simple type name.
	pub tag: TypeTag,
	/// Natural text of a leaf. Absent for null and composites.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	/// Access modifier, set only on object property key nodes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub access: Option<AccessModifier>,
	/// Declaring class of an inherited private property key.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub declared_by: Option<Box<str>>,
	/// Entries of an array or object.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub children: Option<TreeChildren>,
}

/// Structural metadata and entries of a composite node.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TreeChildren {
	/// Number of entries.
	pub count: usize,
	/// Instance class, objects only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub class_name: Option<Box<str>>,
	/// Initial presentation state.
	pub expanded: bool,
	/// Key/value pairs in serialized order.
	pub entries: Vec<TreeEntry>,
}

/// One rendered key/value pair.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TreeEntry {
	/// Rendered key; object keys carry the demangled name.
	pub key: TreeNode,
	/// Rendered value.
	pub value: TreeNode,
}

impl TreeNode {
	fn leaf(tag: TypeTag, text: Option<String>) -> Self {
		Self {
			tag,
			text,
			access: None,
			declared_by: None,
			children: None,
		}
	}

	/// Whether this node has no children block.
	pub fn is_leaf(&self) -> bool {
		self.children.is_none()
	}
}

/// Render the subtree rooted at `id`.
///
/// References are dereferenced one level only: the leaf shows the target's
/// summary text and never re-expands it, so reference cycles are harmless
/// here. A reference to a missing node fails with `DanglingReference`.
pub fn render_tree(doc: &Document, id: NodeId) -> Result<TreeNode> {
	let value = doc.resolve(id)?;
	match value {
		Value::Null => Ok(TreeNode::leaf(TypeTag::Null, None)),
		Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) | Value::CustomObject(_) => {
			Ok(TreeNode::leaf(value.type_tag(), value.scalar_text()))
		}
		Value::Reference(target) => {
			let text = doc.resolve(*target)?.summary();
			Ok(TreeNode::leaf(TypeTag::Reference, Some(text)))
		}
		Value::Array(entries) => {
			let mut out = Vec::with_capacity(entries.len());
			for entry in entries {
				out.push(TreeEntry {
					key: render_key(&entry.key),
					value: render_tree(doc, entry.value)?,
				});
			}
			Ok(composite(TypeTag::Array, None, out))
		}
		Value::Object(object) => {
			let mut out = Vec::with_capacity(object.properties.len());
			for entry in &object.properties {
				let info = property_info(entry.raw_key.as_bytes(), &object.class_name);
				let mut key = TreeNode::leaf(TypeTag::String, Some(info.name.to_text().into_owned()));
				key.access = Some(info.access);
				key.declared_by = info.declared_by;
				out.push(TreeEntry {
					key,
					value: render_tree(doc, entry.value)?,
				});
			}
			Ok(composite(TypeTag::Object, Some(object.class_name.clone()), out))
		}
	}
}

/// Render the document root.
pub fn render_document(doc: &Document) -> Result<TreeNode> {
	render_tree(doc, doc.root())
}

fn render_key(key: &Key) -> TreeNode {
	match key {
		Key::Int(v) => TreeNode::leaf(TypeTag::Integer, Some(v.to_string())),
		Key::Str(v) => TreeNode::leaf(TypeTag::String, Some(v.to_text().into_owned())),
	}
}

fn composite(tag: TypeTag, class_name: Option<Box<str>>, entries: Vec<TreeEntry>) -> TreeNode {
	TreeNode {
		tag,
		text: None,
		access: None,
		declared_by: None,
		children: Some(TreeChildren {
			count: entries.len(),
			class_name,
			expanded: true,
			entries,
		}),
	}
}
