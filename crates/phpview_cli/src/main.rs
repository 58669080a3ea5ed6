#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;

#[derive(Parser)]
#[command(name = "phpview", about = "PHP serialize() payload viewer")]
struct Cli {
	/// Raise log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Render the decoded value tree.
	Tree(cmd::tree::Args),
	/// Project the decoded value to JSON.
	Json(cmd::json::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> phpview::php::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Commands::Tree(args) => cmd::tree::run(args),
		Commands::Json(args) => cmd::json::run(args),
	}
}

fn init_tracing(verbose: u8) {
	let fallback = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}
