//! Optional JSON config file with defaults for every command.
//!
//! Looked up at `$XDG_CONFIG_HOME/ftl/config.json` unless `--config` names
//! another file. Command line flags win over the file, the file wins over
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FtlError, Result};

pub const DEFAULT_FIREFOX_COMMAND: &str = "firefox";
pub const DEFAULT_WMCTRL_COMMAND: &str = "wmctrl";
/// `WM_CLASS` of Firefox browser windows as listed by `wmctrl -l -x`.
pub const DEFAULT_WINDOW_CLASS: &str = "Navigator.firefox";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SETTLE_MS: u64 = 5_000;

/// Contents of the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FileConfig {
	pub firefox_dir: Option<PathBuf>,
	pub profile_pattern: Option<String>,
	pub find_session_dir: Option<bool>,
	pub firefox_command: Option<String>,
	pub wmctrl_command: Option<String>,
	pub window_class: Option<String>,
	pub timeout_ms: Option<u64>,
	pub concurrency: Option<usize>,
	pub settle_ms: Option<u64>,
}

/// Effective settings after applying defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	/// Directory searched for profiles, `~/.mozilla/firefox` by default.
	pub firefox_dir: PathBuf,
	pub profile_pattern: String,
	pub find_session_dir: bool,
	pub firefox_command: String,
	pub wmctrl_command: String,
	pub window_class: String,
	/// Per actuator call; 0 disables the limit.
	pub timeout_ms: u64,
	pub concurrency: usize,
	/// How long to wait for a new Firefox window to show up.
	pub settle_ms: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Settings::from(FileConfig::default())
	}
}

impl From<FileConfig> for Settings {
	fn from(file: FileConfig) -> Self {
		Self {
			firefox_dir: file.firefox_dir.unwrap_or_else(default_firefox_dir),
			profile_pattern: file
				.profile_pattern
				.unwrap_or_else(|| ftl::source::DEFAULT_PROFILE_PATTERN.to_string()),
			find_session_dir: file.find_session_dir.unwrap_or(false),
			firefox_command: file.firefox_command.unwrap_or_else(|| DEFAULT_FIREFOX_COMMAND.to_string()),
			wmctrl_command: file.wmctrl_command.unwrap_or_else(|| DEFAULT_WMCTRL_COMMAND.to_string()),
			window_class: file.window_class.unwrap_or_else(|| DEFAULT_WINDOW_CLASS.to_string()),
			timeout_ms: file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
			concurrency: file.concurrency.unwrap_or(1).max(1),
			settle_ms: file.settle_ms.unwrap_or(DEFAULT_SETTLE_MS),
		}
	}
}

impl Settings {
	/// Load the config file (explicit or default location) and apply defaults.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		Ok(Settings::from(load_file(explicit)?))
	}

	pub fn call_timeout(&self) -> Option<Duration> {
		(self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
	}

	pub fn settle(&self) -> Duration {
		Duration::from_millis(self.settle_ms)
	}
}

/// `$XDG_CONFIG_HOME/ftl/config.json`, if a config directory is known.
pub fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("ftl").join("config.json"))
}

pub fn default_firefox_dir() -> PathBuf {
	dirs::home_dir()
		.unwrap_or_else(|| PathBuf::from("."))
		.join(".mozilla")
		.join("firefox")
}

/// Read the config file.
///
/// A missing file at the default location is the same as an empty one; an
/// explicitly named file must exist.
pub fn load_file(explicit: Option<&Path>) -> Result<FileConfig> {
	let (path, required) = match explicit {
		Some(path) => (path.to_path_buf(), true),
		None => match default_config_path() {
			Some(path) => (path, false),
			None => return Ok(FileConfig::default()),
		},
	};

	let content = match fs::read_to_string(&path) {
		Ok(content) => content,
		Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
			debug!(path = %path.display(), "no config file");
			return Ok(FileConfig::default());
		}
		Err(err) => return Err(FtlError::config(&path, err.to_string())),
	};

	let config = serde_json::from_str(&content).map_err(|err| FtlError::config(&path, err.to_string()))?;
	debug!(path = %path.display(), "loaded config");
	Ok(config)
}
