
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Capture and restore Firefox tab lists grouped by workspace.
#[derive(Parser, Debug)]
#[command(name = "ftl")]
#[command(about = "Firefox tab lists, captured per workspace and restored on demand")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default), json, ndjson, or toon
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Config file (default: $XDG_CONFIG_HOME/ftl/config.json)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Write the tab list of the newest Firefox session.
	Dump(DumpArgs),
	/// Reopen the windows of a tab list on their workspaces.
	Restore(RestoreArgs),
	/// Print the current workspace id.
	Workspace,
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Dump(_) => "dump",
			Commands::Restore(_) => "restore",
			Commands::Workspace => "workspace",
		}
	}
}

#[derive(Args, Debug, Clone, Default)]
pub struct DumpArgs {
	/// Only keep this workspace (repeatable)
	#[arg(long = "workspace", value_name = "ID")]
	pub workspaces: Vec<String>,

	/// Only keep windows with this id (repeatable)
	#[arg(long = "window", value_name = "ID")]
	pub windows: Vec<String>,

	/// Only keep the workspace that is currently active
	#[arg(long)]
	pub current_workspace: bool,

	/// Firefox profile directory to read the session from
	#[arg(long, value_name = "DIR")]
	pub session_dir: Option<PathBuf>,

	/// Pick the profile with the newest session (wins over --session-dir)
	#[arg(long, overrides_with = "dont_find_session_dir")]
	pub find_session_dir: bool,

	/// Disable profile discovery enabled in the config file
	#[arg(long, overrides_with = "find_session_dir")]
	pub dont_find_session_dir: bool,

	/// Directory holding Firefox profiles
	#[arg(long, value_name = "DIR")]
	pub firefox_dir: Option<PathBuf>,

	/// Glob matching profile directory names
	#[arg(long, value_name = "GLOB")]
	pub profile_pattern: Option<String>,

	/// Where to write the tab list, `-` for stdout
	#[arg(long, value_name = "FILE", default_value = "-")]
	pub target: String,
}

#[derive(Args, Debug, Clone)]
pub struct RestoreArgs {
	/// Tab list to restore, `-` for stdin
	#[arg(long, value_name = "FILE", default_value = "-")]
	pub source: String,

	/// Windows restored at the same time
	#[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
	pub concurrency: Option<u64>,

	/// Limit for each window manager call, 0 for none
	#[arg(long, value_name = "MS")]
	pub timeout_ms: Option<u64>,

	/// Print the calls a restore would make without touching any window
	#[arg(long)]
	pub dry_run: bool,
}

impl Default for RestoreArgs {
	fn default() -> Self {
		Self {
			source: "-".to_string(),
			concurrency: None,
			timeout_ms: None,
			dry_run: false,
		}
	}
}

/// `-` or a path.
pub fn is_stdio(arg: &str) -> bool {
	arg == "-"
}
