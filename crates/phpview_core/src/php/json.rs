use serde_json::{Map, Number, Value as JsonValue};

use crate::php::{ArrayEntry, Document, Key, NodeId, PhpError, Result, Value, property_info};

/// Switches for JSON projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
	/// Project arrays keyed exactly `0..n-1` in order as JSON lists.
	pub detect_arrays: bool,
	/// Keep protected and private object properties.
	pub include_private: bool,
	/// Maximum number of nested containers and references expanded at once.
	pub max_depth: u32,
}

impl Default for JsonOptions {
	fn default() -> Self {
		Self {
			detect_arrays: true,
			include_private: true,
			max_depth: 512,
		}
	}
}

impl JsonOptions {
	/// Preset for public-only, always-mapping output.
	pub fn public_maps() -> Self {
		Self {
			detect_arrays: false,
			include_private: false,
			..Self::default()
		}
	}
}

/// Project the subtree rooted at `id` to a plain JSON value.
///
/// References are fully inlined. Expanding a node that is already on the
/// expansion stack fails with `CyclicReference`; a stack deeper than
/// `max_depth` fails with `DepthExceeded`.
pub fn project_json(doc: &Document, id: NodeId, opt: &JsonOptions) -> Result<JsonValue> {
	let mut stack = Vec::new();
	project(doc, id, opt, &mut stack)
}

/// Project the document root.
pub fn project_document(doc: &Document, opt: &JsonOptions) -> Result<JsonValue> {
	project_json(doc, doc.root(), opt)
}

/// Render projected JSON as text; `pretty` uses two-space indentation.
pub fn to_json_text(value: &JsonValue, pretty: bool) -> String {
	if pretty { format!("{value:#}") } else { value.to_string() }
}

fn project(doc: &Document, id: NodeId, opt: &JsonOptions, stack: &mut Vec<NodeId>) -> Result<JsonValue> {
	if stack.contains(&id) {
		return Err(PhpError::CyclicReference { node: id });
	}

	let value = doc.resolve(id)?;
	let out = match value {
		Value::Null => JsonValue::Null,
		Value::Bool(v) => JsonValue::Bool(*v),
		Value::Int(v) => JsonValue::Number(Number::from(*v)),
		// JSON has no NaN or infinity.
		Value::Float(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
		Value::String(v) => JsonValue::String(v.to_text().into_owned()),
		Value::CustomObject(v) => JsonValue::String(v.payload.to_text().into_owned()),
		Value::Reference(target) => {
			enter(stack, id, opt)?;
			let inlined = project(doc, *target, opt, stack)?;
			stack.pop();
			inlined
		}
		Value::Array(entries) => {
			enter(stack, id, opt)?;
			let projected = if opt.detect_arrays && is_list(entries) {
				let mut items = Vec::with_capacity(entries.len());
				for entry in entries {
					items.push(project(doc, entry.value, opt, stack)?);
				}
				JsonValue::Array(items)
			} else {
				let mut map = Map::new();
				for entry in entries {
					map.insert(entry.key.to_text(), project(doc, entry.value, opt, stack)?);
				}
				JsonValue::Object(map)
			};
			stack.pop();
			projected
		}
		Value::Object(object) => {
			enter(stack, id, opt)?;
			let mut map = Map::new();
			for entry in &object.properties {
				let info = property_info(entry.raw_key.as_bytes(), &object.class_name);
				if !opt.include_private && !info.is_public() {
					continue;
				}
				map.insert(info.name.to_text().into_owned(), project(doc, entry.value, opt, stack)?);
			}
			stack.pop();
			JsonValue::Object(map)
		}
	};

	Ok(out)
}

fn enter(stack: &mut Vec<NodeId>, id: NodeId, opt: &JsonOptions) -> Result<()> {
	if stack.len() >= opt.max_depth as usize {
		return Err(PhpError::DepthExceeded { max_depth: opt.max_depth });
	}
	stack.push(id);
	Ok(())
}

fn is_list(entries: &[ArrayEntry]) -> bool {
	entries.iter().enumerate().all(|(index, entry)| matches!(entry.key, Key::Int(key) if usize::try_from(key) == Ok(index)))
}
