//! Outcome of a restoration run.

use std::fmt;

use ftl_protocol::{WindowId, WindowSpec, WorkspaceId};
use serde::Serialize;

use super::actuator::{ActuatorError, WindowHandle};
use crate::error::{Error, Result};

/// Step of a window's restoration that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Stage {
	CreateWindow,
	/// `index` is the 0-based position of the tab in the window's URL list.
	OpenTab { index: usize, url: String },
	AssignWorkspace,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Stage::CreateWindow => write!(f, "create window"),
			Stage::OpenTab { index, url } => write!(f, "open tab {index} ({url})"),
			Stage::AssignWorkspace => write!(f, "assign workspace"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredWindow {
	pub workspace: WorkspaceId,
	pub window: WindowId,
	pub handle: String,
	pub tabs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowFailure {
	pub workspace: WorkspaceId,
	pub window: WindowId,
	pub stage: Stage,
	pub reason: String,
}

impl WindowFailure {
	pub(crate) fn new(spec: &WindowSpec, stage: Stage, err: ActuatorError) -> Self {
		Self {
			workspace: spec.workspace.clone(),
			window: spec.window.clone(),
			stage,
			reason: err.to_string(),
		}
	}
}

impl fmt::Display for WindowFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{} ({}: {})", self.workspace, self.window, self.stage, self.reason)
	}
}

/// Per-window results, sorted by (workspace, window).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
	pub restored: Vec<RestoredWindow>,
	pub failed: Vec<WindowFailure>,
}

impl RestoreReport {
	pub(crate) fn from_outcomes(outcomes: Vec<std::result::Result<RestoredWindow, WindowFailure>>) -> Self {
		let mut report = RestoreReport::default();
		for outcome in outcomes {
			match outcome {
				Ok(restored) => report.restored.push(restored),
				Err(failure) => report.failed.push(failure),
			}
		}
		report
			.restored
			.sort_by(|a, b| (&a.workspace, &a.window).cmp(&(&b.workspace, &b.window)));
		report
			.failed
			.sort_by(|a, b| (&a.workspace, &a.window).cmp(&(&b.workspace, &b.window)));
		report
	}

	pub fn attempted(&self) -> usize {
		self.restored.len() + self.failed.len()
	}

	pub fn is_success(&self) -> bool {
		self.failed.is_empty()
	}

	/// Turn any failure into [`Error::Restoration`].
	pub fn into_result(self) -> Result<Self> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(Error::Restoration {
				attempted: self.attempted(),
				failures: self.failed,
			})
		}
	}
}

pub(crate) fn restored(spec: &WindowSpec, handle: &WindowHandle) -> RestoredWindow {
	RestoredWindow {
		workspace: spec.workspace.clone(),
		window: spec.window.clone(),
		handle: handle.to_string(),
		tabs: spec.urls.len(),
	}
}
