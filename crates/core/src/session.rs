//! The parts of Firefox's `sessionstore` JSON that ftl reads.
//!
//! Everything else in the file (closed windows, form data, cookies, scroll
//! positions, ...) is ignored.

use ftl_protocol::WorkspaceId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DecodeError;

/// URL used for a tab that has no history entries.
pub const BLANK_URL: &str = "about:blank";

const FORMAT_NAME: &str = "sessionrestore";

/// A decoded session snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionState {
	/// `["sessionrestore", 1]` in every Firefox release that writes `mozLz4`.
	#[serde(default)]
	pub version: Option<(String, u32)>,
	pub windows: Vec<WindowState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowState {
	#[serde(default)]
	pub tabs: Vec<TabState>,

	/// Desktop the window sat on when the session was saved (X11 only).
	#[serde(rename = "workspaceID", default, deserialize_with = "opaque_token")]
	pub workspace_id: Option<WorkspaceId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabState {
	/// Back/forward history of the tab, oldest first.
	#[serde(default)]
	pub entries: Vec<HistoryEntry>,

	/// 1-based position of the current entry in `entries`.
	#[serde(default)]
	pub index: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
	#[serde(default)]
	pub url: Option<String>,
}

impl SessionState {
	pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
		let state: SessionState = serde_json::from_slice(bytes)?;
		if let Some((name, _)) = &state.version {
			if name != FORMAT_NAME {
				return Err(DecodeError::UnsupportedVersion(name.clone()));
			}
		}
		Ok(state)
	}
}

impl TabState {
	/// URL currently shown in the tab.
	///
	/// Falls back to the newest history entry when `index` is missing or out
	/// of range, and to [`BLANK_URL`] when there is no history at all.
	pub fn current_url(&self) -> &str {
		self.index
			.and_then(|index| index.checked_sub(1))
			.and_then(|index| self.entries.get(index))
			.or_else(|| self.entries.last())
			.and_then(|entry| entry.url.as_deref())
			.unwrap_or(BLANK_URL)
	}
}

impl WindowState {
	pub fn tab_urls(&self) -> Vec<String> {
		self.tabs.iter().map(|tab| tab.current_url().to_string()).collect()
	}
}

/// Accept `"3"` or `3` as the same opaque token; `null`/`""` mean unset.
fn opaque_token<'de, D>(deserializer: D) -> Result<Option<WorkspaceId>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<Value>::deserialize(deserializer)? {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(token)) if token.is_empty() => Ok(None),
		Some(Value::String(token)) => Ok(Some(WorkspaceId::new(token))),
		Some(Value::Number(number)) => Ok(Some(WorkspaceId::new(number.to_string()))),
		Some(other) => Err(D::Error::custom(format!(
			"workspaceID must be a string or integer, found {other}"
		))),
	}
}
