//! `ftl dump`: write the tab list of a Firefox session.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use ftl::extract::{self, Selection};
use ftl::source::{self, Lookup};
use ftl::{SessionSource, TabList, WindowId, WorkspaceId};
use tempfile::NamedTempFile;
use tracing::info;

use crate::cli::{DumpArgs, is_stdio};
use crate::config::Settings;
use crate::error::{FtlError, Result};
use crate::wm::Wmctrl;

pub async fn run(args: DumpArgs, settings: &Settings) -> Result<()> {
	let source = locate(&args, settings)?;
	info!(target = "ftl_cli", root = %source.root().display(), file = %source.session_file().display(), "using session");

	let mut selection = Selection {
		workspaces: args.workspaces.iter().map(|id| WorkspaceId::from(id.as_str())).collect(),
		windows: args.windows.iter().map(|id| WindowId::from(id.as_str())).collect(),
	};
	if args.current_workspace {
		let current = Wmctrl::locate(&settings.wmctrl_command)?.current_desktop().await?;
		info!(target = "ftl_cli", workspace = %current, "current workspace");
		selection.workspaces.push(current);
	}

	let tabs = extract::extract(&source, &selection)?;
	write_tab_list(&tabs, &args.target)?;
	info!(
		target = "ftl_cli",
		windows = tabs.window_count(),
		tabs = tabs.tab_count(),
		to = %args.target,
		"wrote tab list"
	);
	Ok(())
}

/// Discovery when asked for (flag or config), else the explicit directory.
fn locate(args: &DumpArgs, settings: &Settings) -> Result<SessionSource> {
	let find = args.find_session_dir || (settings.find_session_dir && !args.dont_find_session_dir);

	let lookup = if find {
		Lookup::Discover {
			profile_root: args.firefox_dir.as_deref().unwrap_or(&settings.firefox_dir),
			pattern: args.profile_pattern.as_deref().unwrap_or(&settings.profile_pattern),
		}
	} else if let Some(dir) = args.session_dir.as_deref() {
		Lookup::Explicit(dir)
	} else {
		return Err(FtlError::Ftl(ftl::Error::source_not_found(
			&settings.firefox_dir,
			"no profile chosen; pass --session-dir or --find-session-dir",
		)));
	};

	Ok(source::locate(lookup)?)
}

fn write_tab_list(tabs: &TabList, target: &str) -> Result<()> {
	if is_stdio(target) {
		let stdout = io::stdout().lock();
		let mut out = BufWriter::new(stdout);
		tabs.write_json(&mut out)?;
		out.flush()?;
		return Ok(());
	}

	// Written next to the target and renamed over it, so a failed write
	// leaves any previous file untouched.
	let target = Path::new(target);
	let dir = match target.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let mut tmp = NamedTempFile::new_in(dir)?;
	{
		let mut out = BufWriter::new(tmp.as_file_mut());
		tabs.write_json(&mut out)?;
		out.flush()?;
	}
	tmp.persist(target).map_err(|err| FtlError::Io(err.error))?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	fn tabs() -> TabList {
		TabList::from_json_str(r#"{"1": {"0": ["https://a.example/"]}}"#).unwrap()
	}

	#[test]
	fn target_file_is_replaced_whole() {
		let tmp = TempDir::new().unwrap();
		let target = tmp.path().join("tabs.json");
		std::fs::write(&target, "old contents that are longer than the new tab list ...").unwrap();

		write_tab_list(&tabs(), target.to_str().unwrap()).unwrap();

		assert_eq!(std::fs::read_to_string(&target).unwrap(), tabs().to_json_pretty().unwrap());
		assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
	}

	#[test]
	fn failed_write_keeps_previous_target() {
		let tmp = TempDir::new().unwrap();
		let target = tmp.path().join("tabs.json");
		std::fs::write(&target, "previous").unwrap();
		let missing_dir = tmp.path().join("absent").join("tabs.json");

		assert!(write_tab_list(&tabs(), missing_dir.to_str().unwrap()).is_err());
		assert_eq!(std::fs::read_to_string(&target).unwrap(), "previous");
		assert!(!missing_dir.exists());
	}

	#[test]
	fn directory_target_is_rejected_without_side_effects() {
		let tmp = TempDir::new().unwrap();
		let target = tmp.path().join("taken");
		std::fs::create_dir(&target).unwrap();
		std::fs::write(target.join("keep"), "x").unwrap();

		assert!(write_tab_list(&tabs(), target.to_str().unwrap()).is_err());
		assert!(target.join("keep").exists());
		assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
	}
}
