use phpview::php::{AccessModifier, TreeChildren, TreeNode, TypeTag};

/// Output truncation limits for rendered trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of entries printed for one array or object.
	pub max_entries: usize,
	/// Maximum nesting depth printed before composites collapse.
	pub max_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_entries: 64,
			max_depth: 32,
		}
	}
}

/// Render a tree as indented text, one entry per line.
pub fn print_tree(node: &TreeNode, options: PrintOptions) -> String {
	let mut lines = Vec::new();
	push_node(&mut lines, "", node, 0, 0, options);
	let mut out = lines.join("\n");
	out.push('\n');
	out
}

fn push_node(lines: &mut Vec<String>, lead: &str, node: &TreeNode, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	let Some(children) = &node.children else {
		lines.push(format!("{pad}{lead}{}", leaf_text(node, options)));
		return;
	};

	let header = composite_header(node.tag, children);
	let (open, close) = if node.tag == TypeTag::Object { ("{", "}") } else { ("[", "]") };
	if children.entries.is_empty() {
		lines.push(format!("{pad}{lead}{header} {open}{close}"));
		return;
	}
	if depth >= options.max_depth {
		lines.push(format!("{pad}{lead}{header} {open} ... {close}"));
		return;
	}

	lines.push(format!("{pad}{lead}{header} {open}"));
	for entry in children.entries.iter().take(options.max_entries) {
		let lead = key_lead(node.tag, &entry.key, options);
		push_node(lines, &lead, &entry.value, indent + 2, depth + 1, options);
	}
	if children.entries.len() > options.max_entries {
		lines.push(format!("{pad}  ... {} more", children.entries.len() - options.max_entries));
	}
	lines.push(format!("{pad}{close}"));
}

fn composite_header(tag: TypeTag, children: &TreeChildren) -> String {
	match &children.class_name {
		Some(class_name) => format!("{tag}({class_name})({})", children.count),
		None => format!("{tag}({})", children.count),
	}
}

fn key_lead(parent: TypeTag, key: &TreeNode, options: PrintOptions) -> String {
	let name = key.text.as_deref().unwrap_or_default();
	if parent != TypeTag::Object {
		return match key.tag {
			TypeTag::Integer => format!("{name} => "),
			_ => format!("{:?} => ", truncate(name, options.max_string_len)),
		};
	}

	match (key.access, key.declared_by.as_deref()) {
		(Some(AccessModifier::Private), Some(declared_by)) => format!("private({declared_by}) {name} = "),
		(Some(access @ (AccessModifier::Private | AccessModifier::Protected)), _) => format!("{access} {name} = "),
		_ => format!("{name} = "),
	}
}

fn leaf_text(node: &TreeNode, options: PrintOptions) -> String {
	let text = node.text.as_deref().unwrap_or_default();
	match node.tag {
		TypeTag::Null => "null".to_owned(),
		TypeTag::String => format!("{:?}", truncate(text, options.max_string_len)),
		TypeTag::Object => format!("object {:?}", truncate(text, options.max_string_len)),
		TypeTag::Reference => format!("&{text}"),
		_ => text.to_owned(),
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}
