use std::path::PathBuf;

use phpview::php::{JsonOptions, Result, project_document, to_json_text};
use tracing::debug;

use crate::cmd::util::load_document;

#[derive(clap::Args)]
pub struct Args {
	/// Payload file; stdin when omitted or `-`.
	pub file: Option<PathBuf>,
	/// Keep sequential arrays as key/value mappings.
	#[arg(long = "no-detect-arrays")]
	pub no_detect_arrays: bool,
	/// Drop protected and private properties.
	#[arg(long = "public-only")]
	pub public_only: bool,
	/// Single-line output.
	#[arg(long)]
	pub compact: bool,
	/// Write the JSON text to a file instead of stdout.
	#[arg(long)]
	pub out: Option<PathBuf>,
	/// Fail on damaged property keys instead of repairing them.
	#[arg(long)]
	pub strict: bool,
	/// Maximum nesting of containers and references expanded into the output.
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
}

/// Decode a payload and print its JSON projection.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file,
		no_detect_arrays,
		public_only,
		compact,
		out,
		strict,
		max_depth,
	} = args;

	let doc = load_document(file.as_deref(), strict)?;
	let defaults = JsonOptions::default();
	let options = JsonOptions {
		detect_arrays: !no_detect_arrays,
		include_private: !public_only,
		max_depth: max_depth.unwrap_or(defaults.max_depth),
	};
	let value = project_document(&doc, &options)?;
	let text = to_json_text(&value, !compact);

	match out {
		Some(path) => {
			std::fs::write(&path, format!("{text}\n"))?;
			debug!(path = %path.display(), bytes = text.len(), "wrote json output");
			println!("Copied to {}", path.display());
		}
		None => println!("{text}"),
	}
	Ok(())
}
