//! Turning a session file into a [`TabList`].

use std::fs;
use std::path::Path;

use ftl_protocol::{TabList, WindowId, WorkspaceEntry, WorkspaceId};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::mozlz4;
use crate::session::SessionState;
use crate::source::SessionSource;

/// Workspace token for windows saved without a `workspaceID` (e.g. on
/// Wayland, where Firefox cannot query the desktop).
pub const UNASSIGNED_WORKSPACE: &str = "unassigned";

/// Which workspaces and windows to keep. Empty lists mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
	pub workspaces: Vec<WorkspaceId>,
	pub windows: Vec<WindowId>,
}

impl Selection {
	pub fn all() -> Self {
		Self::default()
	}

	pub fn workspace(id: impl Into<WorkspaceId>) -> Self {
		Self::default().with_workspace(id)
	}

	pub fn window(id: impl Into<WindowId>) -> Self {
		Self::default().with_window(id)
	}

	pub fn with_workspace(mut self, id: impl Into<WorkspaceId>) -> Self {
		self.workspaces.push(id.into());
		self
	}

	pub fn with_window(mut self, id: impl Into<WindowId>) -> Self {
		self.windows.push(id.into());
		self
	}

	pub fn is_all(&self) -> bool {
		self.workspaces.is_empty() && self.windows.is_empty()
	}
}

/// Read `source` and return the selected windows' tabs.
///
/// Decoding failures abort the whole extraction.
pub fn extract(source: &SessionSource, selection: &Selection) -> Result<TabList> {
	let session = read_session(source.session_file())?;
	let tabs = select(group_by_workspace(&session), selection);
	info!(
		workspaces = tabs.workspace_ids().count(),
		windows = tabs.window_count(),
		tabs = tabs.tab_count(),
		"extracted tab list"
	);
	Ok(tabs)
}

pub fn read_session(path: &Path) -> Result<SessionState> {
	let bytes = fs::read(path).map_err(|err| Error::session_parse(path, err))?;
	let json = mozlz4::decode(&bytes).map_err(|err| Error::session_parse(path, err))?;
	debug!(path = %path.display(), compressed = bytes.len(), decompressed = json.len(), "decoded session file");
	SessionState::from_json(&json).map_err(|err| Error::session_parse(path, err))
}

/// Group every window under its captured workspace.
///
/// Window ids are the window's ordinal among the windows of the same
/// workspace, in session order: `"0"`, `"1"`, ...
pub fn group_by_workspace(session: &SessionState) -> TabList {
	let mut tabs = TabList::new();
	let mut unassigned = 0usize;

	for window in &session.windows {
		let workspace = window.workspace_id.clone().unwrap_or_else(|| {
			unassigned += 1;
			WorkspaceId::from(UNASSIGNED_WORKSPACE)
		});
		let entry = tabs.workspace_entry(workspace);
		let ordinal = WindowId::new(entry.len().to_string());
		entry.insert(ordinal, window.tab_urls());
	}

	if unassigned > 0 {
		warn!(
			windows = unassigned,
			"session has windows without a workspace id; grouped under `{UNASSIGNED_WORKSPACE}`"
		);
	}
	tabs
}

/// Apply `selection` to a full tab list.
///
/// - A requested workspace is always present, empty if it had no windows.
/// - With a window filter, workspaces where none of the requested windows
///   exist are dropped unless they were requested themselves.
pub fn select(all: TabList, selection: &Selection) -> TabList {
	if selection.is_all() {
		return all;
	}

	let mut selected = TabList::new();
	for (workspace, windows) in all {
		let requested = selection.workspaces.contains(&workspace);
		if !selection.workspaces.is_empty() && !requested {
			continue;
		}

		let windows: WorkspaceEntry = windows
			.into_iter()
			.filter(|(window, _)| selection.windows.is_empty() || selection.windows.contains(window))
			.collect();
		if windows.is_empty() && !requested {
			continue;
		}
		*selected.workspace_entry(workspace) = windows;
	}

	for workspace in &selection.workspaces {
		if !selected.contains_workspace(workspace.as_str()) {
			debug!(%workspace, "requested workspace has no open windows");
			selected.workspace_entry(workspace.clone());
		}
	}
	selected
}
