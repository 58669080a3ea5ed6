use crate::php::{PhpError, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Borrow all unread bytes without advancing.
	pub fn rest(&self) -> &'a [u8] {
		&self.bytes[self.pos.min(self.bytes.len())..]
	}

	/// Read one byte and advance.
	pub fn read_u8(&mut self) -> Result<u8> {
		let byte = self.bytes.get(self.pos).copied().ok_or(PhpError::UnexpectedEof {
			at: self.pos,
			need: 1,
			rem: 0,
		})?;
		self.pos += 1;
		Ok(byte)
	}

	/// Read one byte and fail unless it equals `expected`.
	pub fn expect(&mut self, expected: u8) -> Result<()> {
		let at = self.pos;
		let got = self.read_u8()?;
		if got != expected {
			return Err(PhpError::UnexpectedByte {
				at,
				expected: char::from(expected),
				got: char::from(got),
			});
		}
		Ok(())
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(PhpError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read bytes up to `delimiter`, consuming the delimiter but not returning it.
	pub fn read_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
		let start = self.pos;
		let Some(rel_end) = self.rest().iter().position(|byte| *byte == delimiter) else {
			return Err(PhpError::UnexpectedEof {
				at: self.pos,
				need: 1,
				rem: self.remaining(),
			});
		};

		let end = start + rel_end;
		self.pos = end + 1;
		Ok(&self.bytes[start..end])
	}

	/// Move to an absolute offset within the slice.
	pub fn seek(&mut self, pos: usize) {
		self.pos = pos.min(self.bytes.len());
	}

	/// Advance past ASCII whitespace.
	pub fn skip_ascii_whitespace(&mut self) {
		while self.bytes.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
			self.pos += 1;
		}
	}
}
