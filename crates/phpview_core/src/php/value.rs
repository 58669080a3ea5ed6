use std::borrow::Cow;
use std::fmt;

/// Handle to one node in a [`Document`](crate::php::Document) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
	/// Build a handle from an arena index.
	pub fn from_index(index: usize) -> Self {
		Self(u32::try_from(index).unwrap_or(u32::MAX))
	}

	/// Arena index of this handle.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// PHP string: a byte sequence with no encoding guarantee.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct PhpString(Box<[u8]>);

impl PhpString {
	/// Wrap raw bytes.
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into().into_boxed_slice())
	}

	/// Raw bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Byte length (PHP `strlen`).
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the string has no bytes.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Text form, replacing invalid UTF-8 sequences.
	pub fn to_text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}
}

impl fmt::Debug for PhpString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", self.to_text())
	}
}

impl fmt::Display for PhpString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_text())
	}
}

impl From<&str> for PhpString {
	fn from(value: &str) -> Self {
		Self::new(value.as_bytes())
	}
}

impl From<String> for PhpString {
	fn from(value: String) -> Self {
		Self::new(value.into_bytes())
	}
}

impl From<&[u8]> for PhpString {
	fn from(value: &[u8]) -> Self {
		Self::new(value)
	}
}

impl From<Vec<u8>> for PhpString {
	fn from(value: Vec<u8>) -> Self {
		Self::new(value)
	}
}

/// Array key; PHP only allows integers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	/// Integer key.
	Int(i64),
	/// String key.
	Str(PhpString),
}

impl Key {
	/// Key as it appears in a JSON mapping.
	pub fn to_text(&self) -> String {
		match self {
			Self::Int(v) => v.to_string(),
			Self::Str(v) => v.to_text().into_owned(),
		}
	}
}

/// One array slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayEntry {
	/// Integer or string key.
	pub key: Key,
	/// Owned child node.
	pub value: NodeId,
}

/// One object property with its raw, possibly mangled, key.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEntry {
	/// Key bytes as serialized, visibility prefix included.
	pub raw_key: PhpString,
	/// Owned child node.
	pub value: NodeId,
}

/// Object serialized property-by-property (`O:` record).
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
	/// Instance class name.
	pub class_name: Box<str>,
	/// Properties in serialized order.
	pub properties: Vec<PropertyEntry>,
}

/// Object whose state came from `Serializable::serialize` (`C:` record).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomObjectValue {
	/// Instance class name.
	pub class_name: Box<str>,
	/// Opaque payload between the braces.
	pub payload: PhpString,
}

/// Decoded PHP value stored in a document arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// `N;`
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Signed 64-bit integer.
	Int(i64),
	/// Double, possibly non-finite.
	Float(f64),
	/// Byte string.
	String(PhpString),
	/// Non-owning handle to a node materialized earlier in the same document.
	Reference(NodeId),
	/// Ordered key/value entries.
	Array(Vec<ArrayEntry>),
	/// Class instance with per-property entries.
	Object(ObjectValue),
	/// Class instance with an opaque payload.
	CustomObject(CustomObjectValue),
}

/// Simple type name used for display tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
	/// Null value.
	Null,
	/// Boolean scalar.
	Boolean,
	/// Integer scalar, also used for integer array keys.
	Integer,
	/// Float scalar.
	Float,
	/// String scalar, also used for string keys.
	String,
	/// Back-reference leaf.
	Reference,
	/// Array composite.
	Array,
	/// Object composite or custom-serialized object leaf.
	Object,
}

impl TypeTag {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Boolean => "boolean",
			Self::Integer => "integer",
			Self::Float => "float",
			Self::String => "string",
			Self::Reference => "reference",
			Self::Array => "array",
			Self::Object => "object",
		}
	}
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Value {
	/// Display tag for this variant. Custom objects share the `object` tag.
	pub fn type_tag(&self) -> TypeTag {
		match self {
			Self::Null => TypeTag::Null,
			Self::Bool(_) => TypeTag::Boolean,
			Self::Int(_) => TypeTag::Integer,
			Self::Float(_) => TypeTag::Float,
			Self::String(_) => TypeTag::String,
			Self::Reference(_) => TypeTag::Reference,
			Self::Array(_) => TypeTag::Array,
			Self::Object(_) | Self::CustomObject(_) => TypeTag::Object,
		}
	}

	/// Owned child handles, in entry order. Empty for leaves and references.
	pub fn children(&self) -> Vec<NodeId> {
		match self {
			Self::Array(entries) => entries.iter().map(|entry| entry.value).collect(),
			Self::Object(object) => object.properties.iter().map(|entry| entry.value).collect(),
			_ => Vec::new(),
		}
	}

	/// Natural text of a scalar leaf; `None` for null, references, and composites.
	pub fn scalar_text(&self) -> Option<String> {
		match self {
			Self::Bool(v) => Some(v.to_string()),
			Self::Int(v) => Some(v.to_string()),
			Self::Float(v) => Some(float_text(*v)),
			Self::String(v) => Some(v.to_text().into_owned()),
			Self::CustomObject(v) => Some(v.payload.to_text().into_owned()),
			Self::Null | Self::Reference(_) | Self::Array(_) | Self::Object(_) => None,
		}
	}

	/// One-line summary used where a value is shown without expanding it.
	pub fn summary(&self) -> String {
		match self {
			Self::Null => "null".to_owned(),
			Self::Reference(_) => "reference".to_owned(),
			Self::Array(entries) => format!("array({})", entries.len()),
			Self::Object(object) => format!("object({})({})", object.class_name, object.properties.len()),
			other => other.scalar_text().unwrap_or_default(),
		}
	}
}

/// Shortest text that parses back to the same `f64`, spelled the way PHP
/// spells non-finite values and exponents (`1.0E+25`, `1.5E-7`).
///
/// Magnitudes from `1e-4` up to `1e15` print in plain decimal.
pub fn float_text(value: f64) -> String {
	if value.is_nan() {
		return "NAN".to_owned();
	}
	if value.is_infinite() {
		return if value.is_sign_negative() { "-INF".to_owned() } else { "INF".to_owned() };
	}

	let magnitude = value.abs();
	if magnitude == 0.0 || (1e-4..1e15).contains(&magnitude) {
		return value.to_string();
	}

	let exp = format!("{value:e}");
	let (mantissa, power) = exp.split_once('e').unwrap_or((exp.as_str(), "0"));
	let point = if mantissa.contains('.') { "" } else { ".0" };
	match power.strip_prefix('-') {
		Some(digits) => format!("{mantissa}{point}E-{digits}"),
		None => format!("{mantissa}{point}E+{power}"),
	}
}
