//! Recreating windows and tabs from a [`TabList`].
//!
//! Every (workspace, window) entry becomes one new window: created, filled
//! with its URLs in order, then moved to its workspace. A failing window is
//! recorded and skipped; the others still get restored.

mod actuator;
mod plan;
mod report;


use std::future::Future;
use std::time::Duration;

use ftl_protocol::{TabList, WindowSpec};
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

pub use actuator::{Actuator, ActuatorError, WindowHandle};
pub use plan::{PlanActuator, PlannedCall};
pub use report::{RestoreReport, RestoredWindow, Stage, WindowFailure};

use crate::error::Result;

/// Default time limit for a single actuator call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOptions {
	/// Windows restored at the same time. Tabs within a window are always
	/// opened one after another.
	pub concurrency: usize,
	/// Limit for each actuator call; `None` waits indefinitely.
	pub call_timeout: Option<Duration>,
}

impl Default for RestoreOptions {
	fn default() -> Self {
		Self {
			concurrency: 1,
			call_timeout: Some(DEFAULT_CALL_TIMEOUT),
		}
	}
}

/// Drives an [`Actuator`] to rebuild the windows of a tab list.
pub struct Restorer<A> {
	actuator: A,
	options: RestoreOptions,
}

impl<A: Actuator> Restorer<A> {
	pub fn new(actuator: A) -> Self {
		Self {
			actuator,
			options: RestoreOptions::default(),
		}
	}

	pub fn with_options(mut self, options: RestoreOptions) -> Self {
		self.options = options;
		self
	}

	pub fn options(&self) -> &RestoreOptions {
		&self.options
	}

	pub fn actuator(&self) -> &A {
		&self.actuator
	}

	/// Restore every window in `tabs`.
	///
	/// Never fails as a whole; use [`RestoreReport::into_result`] to turn
	/// per-window failures into an error.
	pub async fn restore(&self, tabs: &TabList) -> RestoreReport {
		let specs = tabs.window_specs();
		info!(
			windows = specs.len(),
			tabs = tabs.tab_count(),
			concurrency = self.options.concurrency,
			"restoring tab list"
		);

		let outcomes = stream::iter(specs)
			.map(|spec| self.restore_window(spec))
			.buffer_unordered(self.options.concurrency.max(1))
			.collect::<Vec<_>>()
			.await;

		let report = RestoreReport::from_outcomes(outcomes);
		info!(
			restored = report.restored.len(),
			failed = report.failed.len(),
			"restoration finished"
		);
		report
	}

	/// Shape-check `text` as a tab list, then restore it.
	///
	/// A malformed tab list is rejected before any actuator call.
	pub async fn restore_text(&self, text: &str) -> Result<RestoreReport> {
		let tabs = TabList::from_json_str(text)?;
		Ok(self.restore(&tabs).await)
	}

	async fn restore_window(&self, spec: WindowSpec) -> std::result::Result<RestoredWindow, WindowFailure> {
		let handle = self
			.call(self.actuator.create_window())
			.await
			.map_err(|err| failure(&spec, Stage::CreateWindow, err))?;
		debug!(workspace = %spec.workspace, window = %spec.window, %handle, "created window");

		for (index, url) in spec.urls.iter().enumerate() {
			self.call(self.actuator.open_tab(&handle, url))
				.await
				.map_err(|err| failure(&spec, Stage::OpenTab { index, url: url.clone() }, err))?;
		}

		self.call(self.actuator.assign_workspace(&handle, &spec.workspace))
			.await
			.map_err(|err| failure(&spec, Stage::AssignWorkspace, err))?;

		debug!(workspace = %spec.workspace, window = %spec.window, tabs = spec.urls.len(), "restored window");
		Ok(report::restored(&spec, &handle))
	}

	async fn call<T, F>(&self, call: F) -> std::result::Result<T, ActuatorError>
	where
		F: Future<Output = std::result::Result<T, ActuatorError>>,
	{
		match self.options.call_timeout {
			Some(limit) => tokio::time::timeout(limit, call)
				.await
				.map_err(|_| ActuatorError::Timeout(limit))?,
			None => call.await,
		}
	}
}

fn failure(spec: &WindowSpec, stage: Stage, err: ActuatorError) -> WindowFailure {
	warn!(workspace = %spec.workspace, window = %spec.window, %stage, error = %err, "window restoration failed");
	WindowFailure::new(spec, stage, err)
}
