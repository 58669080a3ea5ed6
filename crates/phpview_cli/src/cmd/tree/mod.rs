use std::path::PathBuf;

use phpview::php::{Result, render_document};

use crate::cmd::print::{PrintOptions, print_tree};
use crate::cmd::util::{emit_json, load_document};

#[derive(clap::Args)]
pub struct Args {
	/// Payload file; stdin when omitted or `-`.
	pub file: Option<PathBuf>,
	/// Print the rendered tree structure as JSON.
	#[arg(long)]
	pub json: bool,
	/// Fail on damaged property keys instead of repairing them.
	#[arg(long)]
	pub strict: bool,
	/// Nesting depth printed before composites collapse to `[ ... ]`.
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	/// Characters printed per string before truncation.
	#[arg(long = "max-string")]
	pub max_string: Option<usize>,
	/// Entries printed per array or object.
	#[arg(long = "max-entries")]
	pub max_entries: Option<usize>,
}

/// Decode a payload and print its display tree.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file,
		json,
		strict,
		max_depth,
		max_string,
		max_entries,
	} = args;

	let doc = load_document(file.as_deref(), strict)?;
	let tree = render_document(&doc)?;
	if json {
		return emit_json(&tree);
	}

	let mut options = PrintOptions::default();
	if let Some(value) = max_depth {
		options.max_depth = value;
	}
	if let Some(value) = max_string {
		options.max_string_len = value;
	}
	if let Some(value) = max_entries {
		options.max_entries = value;
	}

	print!("{}", print_tree(&tree, options));
	Ok(())
}
