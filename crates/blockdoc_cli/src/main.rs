#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

const LOG_ENV: &str = "BLOCKDOC_LOG";

#[derive(Parser)]
#[command(name = "blockdoc", about = "Block document ordering, compaction, and link checks")]
struct Cli {
	/// Raise log verbosity (-v info, -vv debug, -vvv trace).
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Version, block counts, roots, and type histogram.
	Info(cmd::info::Args),
	/// Validate link ranges and types, and report required links left empty.
	Check(cmd::check::Args),
	/// Print the computed serialization order.
	Order(cmd::order::Args),
	/// Classify children, reorder blocks, and compact link arrays.
	Sanitize(cmd::sanitize::Args),
	/// Print one block or one field of it.
	Show(cmd::show::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match run(cli.command) {
		Ok(true) => {}
		Ok(false) => std::process::exit(1),
		Err(err) => {
			eprintln!("error: {err}");
			std::process::exit(1);
		}
	}
}

/// Dispatch a command; `Ok(false)` means it ran but reported findings.
fn run(command: Commands) -> blockdoc::doc::Result<bool> {
	match command {
		Commands::Info(args) => cmd::info::run(args).map(|()| true),
		Commands::Check(args) => cmd::check::run(args),
		Commands::Order(args) => cmd::order::run(args).map(|()| true),
		Commands::Sanitize(args) => cmd::sanitize::run(args).map(|()| true),
		Commands::Show(args) => cmd::show::run(args).map(|()| true),
	}
}

fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}
