use std::io::Read;
use std::path::Path;

use phpview::php::{DecodeOptions, Document, Result, decode};
use tracing::debug;

/// Read the raw payload from `path`, or from stdin when absent or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
	match path {
		Some(path) if path != Path::new("-") => {
			let bytes = std::fs::read(path)?;
			debug!(path = %path.display(), bytes = bytes.len(), "read payload file");
			Ok(bytes)
		}
		_ => {
			let mut bytes = Vec::new();
			std::io::stdin().read_to_end(&mut bytes)?;
			debug!(bytes = bytes.len(), "read payload from stdin");
			Ok(bytes)
		}
	}
}

/// Read and decode a payload; `strict` disables key repair.
pub(crate) fn load_document(path: Option<&Path>, strict: bool) -> Result<Document> {
	let bytes = read_input(path)?;
	let opt = if strict { DecodeOptions::strict() } else { DecodeOptions::default() };
	decode(&bytes, &opt)
}

/// Print a serializable payload to stdout as pretty JSON.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(std::io::Error::from)?;
	println!("{text}");
	Ok(())
}
