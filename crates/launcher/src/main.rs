//! workon: open a terminal and an editor on a local Go module.
//!
//! Resolves the pattern under the configured roots, optionally switches the
//! i3 workspace, then starts the terminal in the module directory and the
//! editor on the module's source files.

mod cli;
mod config;
mod error;
mod files;
mod launch;
mod spawn;

use anyhow::Context;
use clap::Parser;

use crate::cli::Cli;
use crate::config::{Config, EnvSnapshot};
use crate::launch::Launcher;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let env = EnvSnapshot::capture();
	let config = Config::load(&cli, &env).context("loading configuration")?;
	tracing::debug!(roots = ?config.resolver.roots, "config.loaded");

	Launcher::new(config).run(&cli.pattern, cli.workspace_target())?;
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("workon=debug,workon_resolve=debug,workon_wm=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.without_time()
		.with_target(false)
		.init();
}
