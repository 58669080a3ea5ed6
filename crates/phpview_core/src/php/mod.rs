mod bytes;
mod decode;
mod document;
mod error;
mod json;
mod tree;
mod value;
mod visibility;

/// Byte-stream decoding entry points and options.
pub use decode::{DecodeOptions, decode, decode_str};
/// Arena document and its builder.
pub use document::{Document, DocumentBuilder};
/// Error and result aliases.
pub use error::{ErrorKind, PhpError, Result};
/// JSON projection entry points and options.
pub use json::{JsonOptions, project_document, project_json, to_json_text};
/// Display tree types and entry points.
pub use tree::{TreeChildren, TreeEntry, TreeNode, render_document, render_tree};
/// Decoded value types.
pub use value::{ArrayEntry, CustomObjectValue, Key, NodeId, ObjectValue, PhpString, PropertyEntry, TypeTag, Value, float_text};
/// Property visibility derivation.
pub use visibility::{AccessModifier, PropertyInfo, property_info};
