use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;

use phpview_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static PHPVIEW_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_arg(name: &str) -> String {
	shared_fixture_path(name).to_string_lossy().into_owned()
}

pub(crate) fn run_phpview(args: &[&str]) -> Output {
	Command::new(phpview_bin()).args(args).output().expect("phpview command executes")
}

pub(crate) fn run_phpview_stdin(args: &[&str], stdin: &[u8]) -> Output {
	let mut child = Command::new(phpview_bin())
		.args(args)
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("phpview command spawns");
	child.stdin.take().expect("stdin is piped").write_all(stdin).expect("stdin accepts payload");
	child.wait_with_output().expect("phpview command finishes")
}

pub(crate) fn run_phpview_json(args: &[&str]) -> serde_json::Value {
	let output = run_phpview(args);
	assert!(
		output.status.success(),
		"phpview command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn phpview_bin() -> &'static PathBuf {
	PHPVIEW_BIN.get_or_init(resolve_phpview_bin)
}

fn resolve_phpview_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_phpview") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "phpview.exe" } else { "phpview" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "phpview"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build phpview binary at {}", bin.display());

	bin
}
