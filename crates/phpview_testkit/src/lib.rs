//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read a fixture payload, dropping one trailing newline added by editors.
pub fn read_fixture(name: &str) -> Vec<u8> {
	let path = fixture_path(name);
	let mut bytes = std::fs::read(&path).unwrap_or_else(|err| panic!("fixture {} is readable: {err}", path.display()));
	if bytes.last() == Some(&b'\n') {
		bytes.pop();
	}
	bytes
}

/// Read the expected JSON paired with a fixture (`<stem>.json`).
pub fn expected_json(stem: &str) -> serde_json::Value {
	let path = fixture_path(&format!("{stem}.json"));
	let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {} is readable: {err}", path.display()));
	serde_json::from_str(&text).unwrap_or_else(|err| panic!("fixture {} is valid json: {err}", path.display()))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}
