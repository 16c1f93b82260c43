//! [`Actuator`] backed by the `firefox` remote command line and `wmctrl`.
//!
//! Firefox offers no way to create an empty window and learn its id, so a
//! window handle stays unbound until its first tab: that tab is opened with
//! `--new-window`, and the X11 window which then appears is bound to the
//! handle. Later tabs go through `--new-tab`, which targets the most recently
//! focused window, so the bound window is activated first. The focus dance
//! is not safe to interleave; calls that depend on it hold `focus`.
//!
//! A bind that gives up (or is cancelled) before its window shows up leaves
//! a straggler behind. The next bind waits for it first, so the late window
//! is never mistaken for its own.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ftl::{Actuator, ActuatorError, WindowHandle, WorkspaceId};
use parking_lot::Mutex;
use tokio::process::Command;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::{Wmctrl, failure_message};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const BLANK_URL: &str = "about:blank";

#[derive(Debug)]
pub struct FirefoxActuator {
	wmctrl: Wmctrl,
	firefox: PathBuf,
	window_class: String,
	settle: Duration,
	next_handle: AtomicUsize,
	/// Handle to X11 window id, `None` until the first tab is opened.
	bound: Mutex<HashMap<WindowHandle, Option<String>>>,
	stragglers: Mutex<Stragglers>,
	focus: tokio::sync::Mutex<()>,
}

/// `--new-window` requests whose window had not appeared when their bind
/// ended.
#[derive(Debug, Default)]
struct Stragglers {
	pending: usize,
	/// Class windows present before the oldest of those requests.
	baseline: HashSet<String>,
}

/// Counts its request as a straggler on drop unless [`bound`](Self::bound)
/// was called.
struct PendingWindow<'a> {
	stragglers: &'a Mutex<Stragglers>,
	before: HashSet<String>,
	armed: bool,
}

impl PendingWindow<'_> {
	fn bound(mut self) {
		self.armed = false;
	}
}

impl Drop for PendingWindow<'_> {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		let mut stragglers = self.stragglers.lock();
		if stragglers.pending == 0 {
			stragglers.baseline = std::mem::take(&mut self.before);
		}
		stragglers.pending += 1;
	}
}

impl FirefoxActuator {
	pub fn new(wmctrl: Wmctrl, firefox: impl Into<PathBuf>) -> Self {
		Self {
			wmctrl,
			firefox: firefox.into(),
			window_class: crate::config::DEFAULT_WINDOW_CLASS.to_string(),
			settle: Duration::from_millis(crate::config::DEFAULT_SETTLE_MS),
			next_handle: AtomicUsize::new(0),
			bound: Mutex::new(HashMap::new()),
			stragglers: Mutex::new(Stragglers::default()),
			focus: tokio::sync::Mutex::new(()),
		}
	}

	pub fn window_class(mut self, class: impl Into<String>) -> Self {
		self.window_class = class.into();
		self
	}

	/// How long to wait for a new window to show up in `wmctrl -l`.
	pub fn settle(mut self, settle: Duration) -> Self {
		self.settle = settle;
		self
	}

	fn lookup(&self, handle: &WindowHandle) -> Result<Option<String>, ActuatorError> {
		self.bound
			.lock()
			.get(handle)
			.cloned()
			.ok_or_else(|| ActuatorError::UnknownHandle(handle.clone()))
	}

	/// Open a new Firefox window showing `url` and bind it to `handle`.
	async fn open_window(&self, handle: &WindowHandle, url: &str) -> Result<String, ActuatorError> {
		self.absorb_stragglers().await?;
		let before: HashSet<String> = self.wmctrl.windows_of_class(&self.window_class).await?.into_iter().collect();

		self.spawn_firefox(&["--new-window", url])?;
		let pending = PendingWindow {
			stragglers: &self.stragglers,
			before,
			armed: true,
		};

		let deadline = Instant::now() + self.settle;
		loop {
			let appeared = self
				.wmctrl
				.windows_of_class(&self.window_class)
				.await?
				.into_iter()
				.find(|id| !pending.before.contains(id));

			if let Some(id) = appeared {
				debug!(target = "ftl_cli::wm", %handle, window = %id, "window appeared");
				self.bound.lock().insert(handle.clone(), Some(id.clone()));
				pending.bound();
				return Ok(id);
			}
			if Instant::now() >= deadline {
				return Err(ActuatorError::WindowNotFound(self.settle));
			}
			sleep(POLL_INTERVAL).await;
		}
	}

	/// Wait up to the settle time for windows of earlier, abandoned binds.
	async fn absorb_stragglers(&self) -> Result<(), ActuatorError> {
		let (pending, baseline) = {
			let stragglers = self.stragglers.lock();
			if stragglers.pending == 0 {
				return Ok(());
			}
			(stragglers.pending, stragglers.baseline.clone())
		};

		let deadline = Instant::now() + self.settle;
		loop {
			let bound: HashSet<String> = self.bound.lock().values().flatten().cloned().collect();
			let late = self
				.wmctrl
				.windows_of_class(&self.window_class)
				.await?
				.into_iter()
				.filter(|id| !baseline.contains(id) && !bound.contains(id))
				.count();

			if late >= pending || Instant::now() >= deadline {
				debug!(target = "ftl_cli::wm", late, pending, "settled late windows");
				*self.stragglers.lock() = Stragglers::default();
				return Ok(());
			}
			sleep(POLL_INTERVAL).await;
		}
	}

	/// Start Firefox detached; a remote invocation exits once it has handed
	/// the request to the running instance, a first start keeps running.
	fn spawn_firefox(&self, args: &[&str]) -> Result<(), ActuatorError> {
		let mut cmd = Command::new(&self.firefox);
		cmd.args(args).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

		#[cfg(unix)]
		cmd.process_group(0);

		let mut child = cmd.spawn().map_err(|err| ActuatorError::Command {
			command: format!("{} {}", self.firefox.display(), args.join(" ")),
			message: err.to_string(),
		})?;

		tokio::spawn(async move {
			let _ = child.wait().await;
		});
		Ok(())
	}

	async fn run_firefox(&self, args: &[&str]) -> Result<(), ActuatorError> {
		let output = Command::new(&self.firefox).args(args).stdin(Stdio::null()).output().await?;
		if !output.status.success() {
			return Err(ActuatorError::Command {
				command: format!("firefox {}", args.join(" ")),
				message: failure_message(output.status, &output.stderr),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl Actuator for FirefoxActuator {
	async fn create_window(&self) -> Result<WindowHandle, ActuatorError> {
		let n = self.next_handle.fetch_add(1, Ordering::Relaxed);
		let handle = WindowHandle::new(format!("window-{n}"));
		self.bound.lock().insert(handle.clone(), None);
		Ok(handle)
	}

	async fn open_tab(&self, window: &WindowHandle, url: &str) -> Result<(), ActuatorError> {
		let bound = self.lookup(window)?;
		let _focus = self.focus.lock().await;

		match bound {
			None => {
				let id = self.open_window(window, url).await?;
				info!(target = "ftl_cli::wm", %window, %id, url, "opened window");
			}
			Some(id) => {
				self.wmctrl.activate(&id).await?;
				self.run_firefox(&["--new-tab", url]).await?;
				debug!(target = "ftl_cli::wm", %window, url, "opened tab");
			}
		}
		Ok(())
	}

	async fn assign_workspace(&self, window: &WindowHandle, workspace: &WorkspaceId) -> Result<(), ActuatorError> {
		let id = match self.lookup(window)? {
			Some(id) => id,
			None => {
				let _focus = self.focus.lock().await;
				self.open_window(window, BLANK_URL).await?
			}
		};

		self.wmctrl.move_to_desktop(&id, workspace).await?;
		info!(target = "ftl_cli::wm", %window, %id, %workspace, "moved window");
		Ok(())
	}
}
