use thiserror::Error;

use crate::php::NodeId;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PhpError>;

/// Coarse error classes surfaced to callers that only need to tell decode
/// failures apart from reference failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Malformed input byte-stream or invalid hand-built tree.
	Decode,
	/// Reference to a node that does not exist (yet).
	DanglingReference,
	/// Reference chain that revisits a node under expansion.
	CyclicReference,
	/// Filesystem or stream failure outside the value model.
	Io,
}

/// Errors produced while decoding, rendering, and projecting PHP values.
#[derive(Debug, Error)]
pub enum PhpError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected end of input at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// A structural delimiter did not match.
	#[error("unexpected byte at offset {at}: expected {expected:?}, got {got:?}")]
	UnexpectedByte {
		/// Byte offset of the mismatch.
		at: usize,
		/// Expected delimiter.
		expected: char,
		/// Actual byte, rendered as a char.
		got: char,
	},
	/// Leading type tag is not part of the serialize grammar.
	#[error("unknown type tag {tag:?} at offset {at}")]
	UnknownTag {
		/// Byte offset of the tag.
		at: usize,
		/// Tag byte, rendered as a char.
		tag: char,
	},
	/// Integer, float, length, or count literal failed to parse.
	#[error("invalid number {text:?} at offset {at}")]
	InvalidNumber {
		/// Byte offset of the literal.
		at: usize,
		/// Literal text (lossy).
		text: String,
	},
	/// Array key was not an integer or string.
	#[error("invalid array key at offset {at}: keys must be integers or strings")]
	InvalidArrayKey {
		/// Byte offset of the key.
		at: usize,
	},
	/// Object property key was not a string.
	#[error("invalid property key at offset {at}: property names must be strings")]
	InvalidPropertyKey {
		/// Byte offset of the key.
		at: usize,
	},
	/// Declared string length disagrees with the payload.
	#[error("string length mismatch at offset {at}: declared {declared}, available {found}")]
	StringLengthMismatch {
		/// Byte offset of the string payload.
		at: usize,
		/// Declared byte length.
		declared: usize,
		/// Bytes actually available before the terminator or end of input.
		found: usize,
	},
	/// Non-whitespace bytes followed the root value.
	#[error("trailing data at offset {at} ({rem} bytes)")]
	TrailingData {
		/// Offset of the first trailing byte.
		at: usize,
		/// Number of trailing bytes.
		rem: usize,
	},
	/// Nesting exceeded the configured limit.
	#[error("nesting depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Reference slot or node handle points at nothing materialized.
	#[error("dangling reference to {target}")]
	DanglingReference {
		/// Slot number (decode) or node handle (render/project) label.
		target: String,
	},
	/// Full expansion revisited a node already on the expansion stack.
	#[error("cyclic reference detected at node {node}")]
	CyclicReference {
		/// Node that closed the cycle.
		node: NodeId,
	},
	/// Hand-built document violates the single-owner tree invariant.
	#[error("malformed value tree at node {node}: {reason}")]
	MalformedTree {
		/// Offending node.
		node: NodeId,
		/// Which invariant failed.
		reason: &'static str,
	},
}

impl PhpError {
	/// Classify into the user-facing error taxonomy.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::DanglingReference { .. } => ErrorKind::DanglingReference,
			Self::CyclicReference { .. } => ErrorKind::CyclicReference,
			_ => ErrorKind::Decode,
		}
	}
}
