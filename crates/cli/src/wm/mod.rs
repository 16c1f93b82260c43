//! X11 window management through `wmctrl`.
//!
//! Firefox stores `_NET_WM_DESKTOP` as each window's `workspaceID`, which is
//! the same number `wmctrl` uses for desktops, so workspace ids pass through
//! unchanged.

mod actuator;

use std::path::PathBuf;

use ftl::{ActuatorError, WorkspaceId};
use tokio::process::Command;
use tracing::debug;

pub use actuator::FirefoxActuator;

/// Resolve `command` on `PATH` (or accept it as a path).
pub fn resolve_program(command: &str) -> Result<PathBuf, ActuatorError> {
	which::which(command).map_err(|err| ActuatorError::Command {
		command: command.to_string(),
		message: format!("not found: {err}"),
	})
}

/// A window as listed by `wmctrl -l -x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedWindow {
	/// Hex X11 window id, e.g. `0x03a00003`.
	pub id: String,
	/// `None` for sticky windows (desktop `-1`).
	pub desktop: Option<String>,
	/// `WM_CLASS` as `instance.class`.
	pub class: String,
	pub title: String,
}

#[derive(Debug, Clone)]
pub struct Wmctrl {
	program: PathBuf,
}

impl Wmctrl {
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self { program: program.into() }
	}

	pub fn locate(command: &str) -> Result<Self, ActuatorError> {
		resolve_program(command).map(Self::new)
	}

	pub async fn current_desktop(&self) -> Result<WorkspaceId, ActuatorError> {
		let out = self.run(&["-d"]).await?;
		parse_current_desktop(&out)
			.map(WorkspaceId::from)
			.ok_or_else(|| ActuatorError::Other("wmctrl reported no active desktop".into()))
	}

	pub async fn windows(&self) -> Result<Vec<ListedWindow>, ActuatorError> {
		let out = self.run(&["-l", "-x"]).await?;
		Ok(parse_window_list(&out))
	}

	/// Ids of the windows whose `WM_CLASS` equals `class`.
	pub async fn windows_of_class(&self, class: &str) -> Result<Vec<String>, ActuatorError> {
		Ok(self
			.windows()
			.await?
			.into_iter()
			.filter(|w| w.class == class)
			.map(|w| w.id)
			.collect())
	}

	/// Raise and focus a window, switching to its desktop.
	pub async fn activate(&self, id: &str) -> Result<(), ActuatorError> {
		self.run(&["-i", "-a", id]).await.map(drop)
	}

	pub async fn move_to_desktop(&self, id: &str, desktop: &WorkspaceId) -> Result<(), ActuatorError> {
		self.run(&["-i", "-r", id, "-t", desktop.as_str()]).await.map(drop)
	}

	async fn run(&self, args: &[&str]) -> Result<String, ActuatorError> {
		debug!(target = "ftl_cli::wm", program = %self.program.display(), ?args, "wmctrl");
		let output = Command::new(&self.program).args(args).output().await?;

		if !output.status.success() {
			return Err(ActuatorError::Command {
				command: format!("wmctrl {}", args.join(" ")),
				message: failure_message(output.status, &output.stderr),
			});
		}
		Ok(String::from_utf8_lossy(&output.stdout).into_owned())
	}
}

pub(crate) fn failure_message(status: std::process::ExitStatus, stderr: &[u8]) -> String {
	let stderr = String::from_utf8_lossy(stderr);
	let stderr = stderr.trim();
	if stderr.is_empty() {
		status.to_string()
	} else {
		format!("{status}: {stderr}")
	}
}

/// Desktop number marked `*` in `wmctrl -d` output.
pub fn parse_current_desktop(output: &str) -> Option<String> {
	output.lines().find_map(|line| {
		let mut fields = line.split_whitespace();
		let number = fields.next()?;
		(fields.next()? == "*").then(|| number.to_string())
	})
}

/// Parse `wmctrl -l -x` output; lines that don't fit are skipped.
pub fn parse_window_list(output: &str) -> Vec<ListedWindow> {
	output
		.lines()
		.filter_map(|line| {
			let mut fields = line.split_whitespace();
			let id = fields.next()?;
			let desktop = fields.next()?;
			let class = fields.next()?;
			let _host = fields.next();
			let title = fields.collect::<Vec<_>>().join(" ");

			if !id.starts_with("0x") || desktop.parse::<i64>().is_err() {
				return None;
			}
			Some(ListedWindow {
				id: id.to_string(),
				desktop: (desktop != "-1").then(|| desktop.to_string()),
				class: class.to_string(),
				title,
			})
		})
		.collect()
}
