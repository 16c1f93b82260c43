//! An actuator that only records what it was asked to do.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ftl_protocol::WorkspaceId;
use parking_lot::Mutex;
use serde::Serialize;

use super::actuator::{Actuator, ActuatorError, WindowHandle};

/// One recorded actuator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum PlannedCall {
	CreateWindow { window: String },
	OpenTab { window: String, url: String },
	AssignWorkspace { window: String, workspace: String },
}

/// Dry-run actuator: never fails, never touches the browser.
#[derive(Debug, Default)]
pub struct PlanActuator {
	next_window: AtomicU64,
	calls: Mutex<Vec<PlannedCall>>,
}

impl PlanActuator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> Vec<PlannedCall> {
		self.calls.lock().clone()
	}

	pub fn take_calls(&self) -> Vec<PlannedCall> {
		std::mem::take(&mut *self.calls.lock())
	}

	fn record(&self, call: PlannedCall) {
		self.calls.lock().push(call);
	}
}

#[async_trait]
impl Actuator for PlanActuator {
	async fn create_window(&self) -> Result<WindowHandle, ActuatorError> {
		let id = self.next_window.fetch_add(1, Ordering::SeqCst);
		let handle = WindowHandle::new(format!("planned-{id}"));
		self.record(PlannedCall::CreateWindow {
			window: handle.to_string(),
		});
		Ok(handle)
	}

	async fn open_tab(&self, window: &WindowHandle, url: &str) -> Result<(), ActuatorError> {
		self.record(PlannedCall::OpenTab {
			window: window.to_string(),
			url: url.to_string(),
		});
		Ok(())
	}

	async fn assign_workspace(&self, window: &WindowHandle, workspace: &WorkspaceId) -> Result<(), ActuatorError> {
		self.record(PlannedCall::AssignWorkspace {
			window: window.to_string(),
			workspace: workspace.to_string(),
		});
		Ok(())
	}
}
