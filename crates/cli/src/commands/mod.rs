mod dump;
mod restore;
mod workspace;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::output::OutputFormat;

pub use restore::RestoreData;

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let settings = Settings::load(cli.config.as_deref())?;

	match cli.command {
		Commands::Dump(args) => dump::run(args, &settings).await,
		Commands::Restore(args) => restore::run(args, &settings, format).await,
		Commands::Workspace => workspace::run(&settings, format).await,
	}
}
