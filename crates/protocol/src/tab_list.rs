//! The workspace → window → URL list model.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::Serialize;

use crate::format::{self, FormatError};
use crate::ids::{WindowId, WorkspaceId};

/// Windows of one workspace, each mapped to its tab URLs in tab order.
pub type WorkspaceEntry = BTreeMap<WindowId, Vec<String>>;

/// A captured set of tabs, grouped by workspace and window.
///
/// Key order carries no meaning; it is kept sorted so the text form is
/// deterministic. URL order within a window is the tab order and is always
/// preserved, duplicates included.
///
/// Deserializing goes through the same shape check as [`TabList::from_json_str`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TabList {
	workspaces: BTreeMap<WorkspaceId, WorkspaceEntry>,
}

/// One window to restore: the unit of work handed to an actuator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
	pub workspace: WorkspaceId,
	pub window: WindowId,
	pub urls: Vec<String>,
}

impl TabList {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert (or replace) a window, creating its workspace if needed.
	///
	/// Returns the URLs previously stored for that window, if any.
	pub fn insert_window(
		&mut self,
		workspace: impl Into<WorkspaceId>,
		window: impl Into<WindowId>,
		urls: Vec<String>,
	) -> Option<Vec<String>> {
		self.workspace_entry(workspace).insert(window.into(), urls)
	}

	/// Get the entry for `workspace`, inserting an empty one if absent.
	///
	/// An empty entry is meaningful: the workspace was asked for but had no
	/// open windows.
	pub fn workspace_entry(&mut self, workspace: impl Into<WorkspaceId>) -> &mut WorkspaceEntry {
		self.workspaces.entry(workspace.into()).or_default()
	}

	pub fn workspace(&self, workspace: &str) -> Option<&WorkspaceEntry> {
		self.workspaces.get(workspace)
	}

	pub fn window(&self, workspace: &str, window: &str) -> Option<&[String]> {
		self.workspaces.get(workspace)?.get(window).map(Vec::as_slice)
	}

	pub fn contains_workspace(&self, workspace: &str) -> bool {
		self.workspaces.contains_key(workspace)
	}

	pub fn workspaces(&self) -> impl Iterator<Item = (&WorkspaceId, &WorkspaceEntry)> {
		self.workspaces.iter()
	}

	pub fn workspace_ids(&self) -> impl Iterator<Item = &WorkspaceId> {
		self.workspaces.keys()
	}

	/// True when there are no workspaces at all (not even empty ones).
	pub fn is_empty(&self) -> bool {
		self.workspaces.is_empty()
	}

	pub fn window_count(&self) -> usize {
		self.workspaces.values().map(BTreeMap::len).sum()
	}

	pub fn tab_count(&self) -> usize {
		self.workspaces
			.values()
			.flat_map(BTreeMap::values)
			.map(Vec::len)
			.sum()
	}

	/// Flatten into one [`WindowSpec`] per (workspace, window) pair.
	///
	/// Empty windows are kept; empty workspaces produce nothing.
	pub fn window_specs(&self) -> Vec<WindowSpec> {
		self.workspaces
			.iter()
			.flat_map(|(workspace, windows)| {
				windows.iter().map(move |(window, urls)| WindowSpec {
					workspace: workspace.clone(),
					window: window.clone(),
					urls: urls.clone(),
				})
			})
			.collect()
	}

	/// Parse the text form, rejecting anything that is not exactly three
	/// levels of object → object → array of strings.
	pub fn from_json_str(text: &str) -> Result<Self, FormatError> {
		let node: format::Node = serde_json::from_str(text)?;
		format::tab_list_from_node(&node)
	}

	pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, FormatError> {
		let mut text = String::new();
		reader.read_to_string(&mut text)?;
		Self::from_json_str(&text)
	}

	/// Write the text form: 4-space indented JSON with a trailing newline.
	pub fn write_json<W: Write>(&self, mut writer: W) -> serde_json::Result<()> {
		let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
		let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
		self.serialize(&mut serializer)?;
		writer.write_all(b"\n").map_err(serde_json::Error::io)
	}

	pub fn to_json_pretty(&self) -> serde_json::Result<String> {
		let mut buf = Vec::new();
		self.write_json(&mut buf)?;
		// serde_json only ever emits UTF-8
		Ok(String::from_utf8_lossy(&buf).into_owned())
	}
}

impl IntoIterator for TabList {
	type Item = (WorkspaceId, WorkspaceEntry);
	type IntoIter = std::collections::btree_map::IntoIter<WorkspaceId, WorkspaceEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.workspaces.into_iter()
	}
}

impl FromIterator<WindowSpec> for TabList {
	fn from_iter<I: IntoIterator<Item = WindowSpec>>(iter: I) -> Self {
		let mut list = TabList::new();
		for spec in iter {
			list.insert_window(spec.workspace, spec.window, spec.urls);
		}
		list
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn urls(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	fn sample() -> TabList {
		let mut list = TabList::new();
		list.insert_window("1", "0", urls(&["https://b.example", "https://a.example", "https://b.example"]));
		list.insert_window("1", "1", Vec::new());
		list.insert_window("3", "0", urls(&["about:blank"]));
		list.workspace_entry("7");
		list
	}

	#[test]
	fn round_trip_preserves_everything() {
		let list = sample();
		let text = list.to_json_pretty().unwrap();
		let parsed = TabList::from_json_str(&text).unwrap();

		assert_eq!(parsed, list);
		assert_eq!(
			parsed.window("1", "0").unwrap(),
			["https://b.example", "https://a.example", "https://b.example"]
		);
		assert!(parsed.window("1", "1").unwrap().is_empty());
		assert!(parsed.workspace("7").unwrap().is_empty());
	}

	#[test]
	fn pretty_output_uses_four_space_indent() {
		let mut list = TabList::new();
		list.insert_window("1", "0", urls(&["http://a"]));

		let text = list.to_json_pretty().unwrap();
		assert_eq!(text, "{\n    \"1\": {\n        \"0\": [\n            \"http://a\"\n        ]\n    }\n}\n");
	}

	#[test]
	fn window_specs_flatten_every_window() {
		let specs = sample().window_specs();

		let pairs: Vec<(&str, &str, usize)> = specs
			.iter()
			.map(|s| (s.workspace.as_str(), s.window.as_str(), s.urls.len()))
			.collect();
		assert_eq!(pairs, [("1", "0", 3), ("1", "1", 0), ("3", "0", 1)]);
	}

	#[test]
	fn counts() {
		let list = sample();
		assert_eq!(list.window_count(), 3);
		assert_eq!(list.tab_count(), 4);
		assert!(!list.is_empty());
		assert!(TabList::new().is_empty());
	}

	#[test]
	fn collect_from_specs_drops_empty_workspaces() {
		let list: TabList = sample().window_specs().into_iter().collect();

		assert_eq!(list.window_count(), 3);
		assert_eq!(list.window("1", "0"), sample().window("1", "0"));
		assert!(!list.contains_workspace("7"));
	}

	#[test]
	fn insert_window_replaces_existing() {
		let mut list = TabList::new();
		assert!(list.insert_window("1", "0", urls(&["http://a"])).is_none());
		let previous = list.insert_window("1", "0", urls(&["http://b"]));
		assert_eq!(previous, Some(urls(&["http://a"])));
		assert_eq!(list.window("1", "0").unwrap(), ["http://b"]);
	}

	#[test]
	fn reader_is_shape_checked() {
		let list = TabList::from_reader(&b"{\"1\": {\"0\": [\"http://a\"]}}"[..]).unwrap();
		assert_eq!(list.window("1", "0").unwrap(), ["http://a"]);

		let err = TabList::from_reader(&b"{\"1\": []}"[..]).unwrap_err();
		assert!(matches!(err, FormatError::Shape { .. }));
	}
}
