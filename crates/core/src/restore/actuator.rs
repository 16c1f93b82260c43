//! The capability the restoration engine drives: creating browser windows,
//! opening tabs in them and moving them to workspaces.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ftl_protocol::WorkspaceId;
use thiserror::Error;

/// Opaque handle for a window created by an [`Actuator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(String);

impl WindowHandle {
	pub fn new(handle: impl Into<String>) -> Self {
		Self(handle.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for WindowHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A single actuator call failed.
#[derive(Debug, Error)]
pub enum ActuatorError {
	/// An external command exited unsuccessfully.
	#[error("`{command}` failed: {message}")]
	Command { command: String, message: String },

	/// A window was requested but never showed up.
	#[error("new window did not appear within {0:?}")]
	WindowNotFound(Duration),

	#[error("unknown window handle `{0}`")]
	UnknownHandle(WindowHandle),

	/// The call exceeded the engine's per-call time limit.
	#[error("timed out after {0:?}")]
	Timeout(Duration),

	#[error("{0}")]
	Other(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Creates and arranges real browser windows.
///
/// Every call is attempted once; retrying is the implementor's business.
#[async_trait]
pub trait Actuator: Send + Sync {
	/// Open a new, empty browser window.
	async fn create_window(&self) -> Result<WindowHandle, ActuatorError>;

	/// Open `url` as the next tab of `window`. The first call may reuse the
	/// window's initial tab.
	async fn open_tab(&self, window: &WindowHandle, url: &str) -> Result<(), ActuatorError>;

	/// Move `window` to `workspace`.
	async fn assign_workspace(&self, window: &WindowHandle, workspace: &WorkspaceId) -> Result<(), ActuatorError>;
}

#[async_trait]
impl<A: Actuator + ?Sized> Actuator for std::sync::Arc<A> {
	async fn create_window(&self) -> Result<WindowHandle, ActuatorError> {
		(**self).create_window().await
	}

	async fn open_tab(&self, window: &WindowHandle, url: &str) -> Result<(), ActuatorError> {
		(**self).open_tab(window, url).await
	}

	async fn assign_workspace(&self, window: &WindowHandle, workspace: &WorkspaceId) -> Result<(), ActuatorError> {
		(**self).assign_workspace(window, workspace).await
	}
}
