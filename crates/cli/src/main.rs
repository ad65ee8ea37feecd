//! `resdex`: build a module → project → app resource tree from directories on disk and
//! query the merged view.

mod cli;
mod commands;
mod logging;

use anyhow::Context;
use clap::Parser;
use resdex_repository::EngineConfig;

use crate::cli::Cli;
use crate::commands::Session;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let config = match &cli.config {
		Some(path) => EngineConfig::load(path)
			.with_context(|| format!("loading configuration from {}", path.display()))?,
		None => EngineConfig::default(),
	};
	logging::setup_tracing(cli.verbose, &config.log.filter);

	let session = Session::open(&config, &cli.res, &cli.deps)?;
	tracing::debug!(folders = session.folder_count(), "session opened");

	let stdout = std::io::stdout();
	session.run(&cli.command, &mut stdout.lock())
}
