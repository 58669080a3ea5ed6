use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::php::bytes::Cursor;
use crate::php::{
	ArrayEntry, CustomObjectValue, Document, DocumentBuilder, Key, NodeId, ObjectValue, PhpError, PhpString, PropertyEntry, Result, Value,
};

/// Runtime limits and behavior switches for `serialize()` decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Repair property keys whose NUL bytes were lost or escaped in transit.
	pub fix_nulls: bool,
	/// Maximum array/object nesting depth.
	pub max_depth: u32,
	/// Accept bytes after the root value instead of failing.
	pub allow_trailing: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			fix_nulls: true,
			max_depth: 512,
			allow_trailing: false,
		}
	}
}

impl DecodeOptions {
	/// Preset that rejects any deviation from the wire format.
	pub fn strict() -> Self {
		Self {
			fix_nulls: false,
			..Self::default()
		}
	}
}

/// Decode a complete `serialize()` payload into a document.
///
/// Leading and trailing ASCII whitespace is ignored.
pub fn decode(bytes: &[u8], opt: &DecodeOptions) -> Result<Document> {
	let mut decoder = Decoder {
		cursor: Cursor::new(bytes),
		opt,
		builder: DocumentBuilder::new(),
		slots: Vec::new(),
	};

	decoder.cursor.skip_ascii_whitespace();
	let root = decoder.value(0)?;
	decoder.cursor.skip_ascii_whitespace();
	if decoder.cursor.remaining() > 0 && !opt.allow_trailing {
		return Err(PhpError::TrailingData {
			at: decoder.cursor.pos(),
			rem: decoder.cursor.remaining(),
		});
	}

	let slots = decoder.slots.len();
	let doc = decoder.builder.finish(root)?;
	debug!(nodes = doc.len(), slots, "decoded serialize payload");
	Ok(doc)
}

/// Decode text input, as pasted into a viewer.
pub fn decode_str(text: &str, opt: &DecodeOptions) -> Result<Document> {
	decode(text.as_bytes(), opt)
}

struct Decoder<'a, 'o> {
	cursor: Cursor<'a>,
	opt: &'o DecodeOptions,
	builder: DocumentBuilder,
	// PHP back-reference table: slot `n` (1-based) is `slots[n - 1]`.
	slots: Vec<NodeId>,
}

impl Decoder<'_, '_> {
	fn value(&mut self, depth: u32) -> Result<NodeId> {
		if depth >= self.opt.max_depth {
			return Err(PhpError::DepthExceeded { max_depth: self.opt.max_depth });
		}

		let at = self.cursor.pos();
		match self.cursor.read_u8()? {
			b'N' => {
				self.cursor.expect(b';')?;
				Ok(self.push_slotted(Value::Null))
			}
			b'b' => {
				self.cursor.expect(b':')?;
				let value = self.bool_body()?;
				Ok(self.push_slotted(Value::Bool(value)))
			}
			b'i' => {
				self.cursor.expect(b':')?;
				let value = self.int_body()?;
				Ok(self.push_slotted(Value::Int(value)))
			}
			b'd' => {
				self.cursor.expect(b':')?;
				let value = self.float_body()?;
				Ok(self.push_slotted(Value::Float(value)))
			}
			b's' => {
				let value = self.string_body(None)?;
				Ok(self.push_slotted(Value::String(value)))
			}
			b'a' => self.array(depth),
			b'O' => self.object(depth),
			b'C' => self.custom_object(),
			b'r' => {
				let target = self.reference_body()?;
				let id = self.builder.push(Value::Reference(target));
				self.slots.push(target);
				Ok(id)
			}
			b'R' => {
				let target = self.reference_body()?;
				Ok(self.builder.push(Value::Reference(target)))
			}
			tag => Err(PhpError::UnknownTag { at, tag: char::from(tag) }),
		}
	}

	fn push_slotted(&mut self, value: Value) -> NodeId {
		let id = self.builder.push(value);
		self.slots.push(id);
		id
	}

	fn reserve_slotted(&mut self) -> NodeId {
		let id = self.builder.reserve();
		self.slots.push(id);
		id
	}

	fn array(&mut self, depth: u32) -> Result<NodeId> {
		self.cursor.expect(b':')?;
		let count = self.usize_until(b':')?;
		self.cursor.expect(b'{')?;

		let id = self.reserve_slotted();
		let mut entries: Vec<ArrayEntry> = Vec::with_capacity(count.min(1024));
		let mut seen: HashMap<Key, usize> = HashMap::new();
		for _ in 0..count {
			let key = self.array_key()?;
			let value = self.value(depth + 1)?;
			match seen.get(&key).copied() {
				Some(slot) => entries[slot].value = value,
				None => {
					seen.insert(key.clone(), entries.len());
					entries.push(ArrayEntry { key, value });
				}
			}
		}
		self.cursor.expect(b'}')?;

		self.builder.fill(id, Value::Array(entries))?;
		Ok(id)
	}

	fn object(&mut self, depth: u32) -> Result<NodeId> {
		let class_name = self.class_name()?;
		self.cursor.expect(b':')?;
		let count = self.usize_until(b':')?;
		self.cursor.expect(b'{')?;

		let id = self.reserve_slotted();
		let mut properties: Vec<PropertyEntry> = Vec::with_capacity(count.min(1024));
		let mut seen: HashMap<PhpString, usize> = HashMap::new();
		for _ in 0..count {
			let raw_key = self.property_key(&class_name)?;
			let value = self.value(depth + 1)?;
			match seen.get(&raw_key).copied() {
				Some(slot) => properties[slot].value = value,
				None => {
					seen.insert(raw_key.clone(), properties.len());
					properties.push(PropertyEntry { raw_key, value });
				}
			}
		}
		self.cursor.expect(b'}')?;

		self.builder.fill(id, Value::Object(ObjectValue { class_name, properties }))?;
		Ok(id)
	}

	fn custom_object(&mut self) -> Result<NodeId> {
		let class_name = self.class_name()?;
		self.cursor.expect(b':')?;
		let len = self.usize_until(b':')?;
		self.cursor.expect(b'{')?;
		let payload = PhpString::from(self.cursor.read_exact(len)?);
		self.cursor.expect(b'}')?;

		Ok(self.push_slotted(Value::CustomObject(CustomObjectValue { class_name, payload })))
	}

	fn class_name(&mut self) -> Result<Box<str>> {
		self.cursor.expect(b':')?;
		let len = self.usize_until(b':')?;
		self.cursor.expect(b'"')?;
		let raw = self.cursor.read_exact(len)?;
		self.cursor.expect(b'"')?;
		Ok(String::from_utf8_lossy(raw).into_owned().into_boxed_str())
	}

	fn reference_body(&mut self) -> Result<NodeId> {
		self.cursor.expect(b':')?;
		let slot = self.usize_until(b';')?;
		let target = slot
			.checked_sub(1)
			.and_then(|index| self.slots.get(index))
			.copied()
			.ok_or_else(|| PhpError::DanglingReference { target: format!("slot {slot}") })?;
		trace!(slot, target = %target, "resolved back-reference");
		Ok(target)
	}

	fn array_key(&mut self) -> Result<Key> {
		let at = self.cursor.pos();
		match self.cursor.read_u8()? {
			b'i' => {
				self.cursor.expect(b':')?;
				Ok(Key::Int(self.int_body()?))
			}
			b's' => Ok(normalize_key(self.string_body(None)?)),
			_ => Err(PhpError::InvalidArrayKey { at }),
		}
	}

	fn property_key(&mut self, class_name: &str) -> Result<PhpString> {
		let at = self.cursor.pos();
		match self.cursor.read_u8()? {
			b's' => self.string_body(Some(class_name)),
			b'i' => {
				self.cursor.expect(b':')?;
				Ok(PhpString::from(self.int_body()?.to_string()))
			}
			_ => Err(PhpError::InvalidPropertyKey { at }),
		}
	}

	fn bool_body(&mut self) -> Result<bool> {
		let at = self.cursor.pos();
		match self.cursor.read_until(b';')? {
			b"0" => Ok(false),
			b"1" => Ok(true),
			other => Err(invalid_number(at, other)),
		}
	}

	fn int_body(&mut self) -> Result<i64> {
		let at = self.cursor.pos();
		let raw = self.cursor.read_until(b';')?;
		parse_ascii::<i64>(raw).ok_or_else(|| invalid_number(at, raw))
	}

	fn float_body(&mut self) -> Result<f64> {
		let at = self.cursor.pos();
		let raw = self.cursor.read_until(b';')?;
		match raw {
			b"INF" => Ok(f64::INFINITY),
			b"-INF" => Ok(f64::NEG_INFINITY),
			b"NAN" => Ok(f64::NAN),
			_ => parse_ascii::<f64>(raw).ok_or_else(|| invalid_number(at, raw)),
		}
	}

	fn usize_until(&mut self, delimiter: u8) -> Result<usize> {
		let at = self.cursor.pos();
		let raw = self.cursor.read_until(delimiter)?;
		parse_ascii::<usize>(raw).ok_or_else(|| invalid_number(at, raw))
	}

	/// Parse `:<len>:"<bytes>";` after the `s` tag. `key_of` names the owning
	/// class when the string is an object property key.
	fn string_body(&mut self, key_of: Option<&str>) -> Result<PhpString> {
		self.cursor.expect(b':')?;
		let declared = self.usize_until(b':')?;
		self.cursor.expect(b'"')?;

		let start = self.cursor.pos();
		let rest = self.cursor.rest();
		if declared.checked_add(2).and_then(|end| rest.get(declared..end)) == Some(b"\";".as_slice()) {
			let bytes = PhpString::from(&rest[..declared]);
			self.cursor.seek(start + declared + 2);
			return Ok(bytes);
		}

		let found = find_string_end(rest);
		match (key_of, found) {
			(Some(class_name), Some(end)) if self.opt.fix_nulls => {
				let repaired = repair_key(&rest[..end], declared, class_name);
				warn!(
					at = start,
					declared,
					found = end,
					repaired = repaired.len(),
					"repaired property key with missing or escaped NUL bytes"
				);
				self.cursor.seek(start + end + 2);
				Ok(repaired)
			}
			_ => Err(PhpError::StringLengthMismatch {
				at: start,
				declared,
				found: found.unwrap_or(rest.len()),
			}),
		}
	}
}

/// Locate the `";` that closes a string whose declared length is wrong.
///
/// The terminator must be followed by end of input, `}`, or a value tag.
fn find_string_end(rest: &[u8]) -> Option<usize> {
	let mut from = 0;
	while let Some(rel) = rest.get(from..)?.iter().position(|byte| *byte == b'"') {
		let quote = from + rel;
		if rest.get(quote + 1) == Some(&b';') {
			match rest.get(quote + 2) {
				None => return Some(quote),
				Some(next) if matches!(next, b'N' | b'b' | b'i' | b'd' | b's' | b'a' | b'O' | b'C' | b'r' | b'R' | b'}') => return Some(quote),
				Some(_) => {}
			}
		}
		from = quote + 1;
	}
	None
}

fn repair_key(found: &[u8], declared: usize, class_name: &str) -> PhpString {
	let unescaped = unescape_nuls(found);
	if unescaped.len() == declared {
		return PhpString::from(unescaped);
	}

	if found.len() + 2 == declared {
		if let Some(name) = found.strip_prefix(b"*") {
			return PhpString::from([b"\0*\0".as_slice(), name].concat());
		}
		if let Some(name) = found.strip_prefix(class_name.as_bytes()) {
			return PhpString::from([b"\0".as_slice(), class_name.as_bytes(), b"\0", name].concat());
		}
	}

	PhpString::from(unescaped)
}

/// Replace textual NUL spellings (`\0`, `\u0000`, `\x00`) with a NUL byte.
fn unescape_nuls(input: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(input.len());
	let mut idx = 0;
	while idx < input.len() {
		let rest = &input[idx..];
		let skip = if rest.starts_with(b"\\u0000") {
			6
		} else if rest.starts_with(b"\\x00") {
			4
		} else if rest.starts_with(b"\\0") {
			2
		} else {
			0
		};

		if skip > 0 {
			out.push(0);
			idx += skip;
		} else {
			out.push(input[idx]);
			idx += 1;
		}
	}
	out
}

/// Canonical decimal string keys become integer keys, as in PHP arrays.
fn normalize_key(raw: PhpString) -> Key {
	let bytes = raw.as_bytes();
	let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
	let canonical = !digits.is_empty()
		&& digits.iter().all(u8::is_ascii_digit)
		&& (digits == b"0" || digits[0] != b'0')
		&& bytes != b"-0";
	if canonical {
		if let Some(value) = parse_ascii::<i64>(bytes) {
			return Key::Int(value);
		}
	}
	Key::Str(raw)
}

fn parse_ascii<T: std::str::FromStr>(raw: &[u8]) -> Option<T> {
	std::str::from_utf8(raw).ok()?.parse().ok()
}

fn invalid_number(at: usize, raw: &[u8]) -> PhpError {
	PhpError::InvalidNumber {
		at,
		text: String::from_utf8_lossy(raw).into_owned(),
	}
}

#[cfg(test)]
mod tests;
