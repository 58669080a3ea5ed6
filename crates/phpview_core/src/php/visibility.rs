use std::fmt;

use crate::php::PhpString;

const PROTECTED_PREFIX: &[u8] = b"\0*\0";

/// Declared access modifier of an object property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
	/// Unprefixed key.
	Public,
	/// Key prefixed with `\0*\0`.
	Protected,
	/// Key prefixed with `\0<Class>\0`.
	Private,
}

impl AccessModifier {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Protected => "protected",
			Self::Private => "private",
		}
	}
}

impl fmt::Display for AccessModifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Demangled property key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
	/// Access modifier encoded by the key prefix.
	pub access: AccessModifier,
	/// Property name with the prefix stripped.
	pub name: PhpString,
	/// Class named by a private prefix, when it is not the instance class.
	pub declared_by: Option<Box<str>>,
}

impl PropertyInfo {
	/// Whether the property is public.
	pub fn is_public(&self) -> bool {
		self.access == AccessModifier::Public
	}
}

/// Derive visibility and name from a raw property key.
///
/// Classification looks only at the prefix shape: a private prefix naming a
/// class outside the instance's hierarchy is still private. A key that starts
/// with NUL but has no closing NUL is treated as a public name verbatim.
pub fn property_info(raw_key: &[u8], class_name: &str) -> PropertyInfo {
	if let Some(name) = raw_key.strip_prefix(PROTECTED_PREFIX) {
		return PropertyInfo {
			access: AccessModifier::Protected,
			name: PhpString::from(name),
			declared_by: None,
		};
	}

	if let Some(rest) = raw_key.strip_prefix(b"\0") {
		if let Some(end) = rest.iter().position(|byte| *byte == 0) {
			let declaring = &rest[..end];
			let declared_by = (declaring != class_name.as_bytes()).then(|| String::from_utf8_lossy(declaring).into_owned().into_boxed_str());
			return PropertyInfo {
				access: AccessModifier::Private,
				name: PhpString::from(&rest[end + 1..]),
				declared_by,
			};
		}
	}

	PropertyInfo {
		access: AccessModifier::Public,
		name: PhpString::from(raw_key),
		declared_by: None,
	}
}
