//! Shape checking for the tab list text form.
//!
//! The text is first parsed into a [`Node`] tree, which keeps every object
//! member in document order (repeated keys included), then walked level by
//! level so a rejection can name the exact path that broke the three-level
//! shape.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use thiserror::Error;

use crate::ids::{WindowId, WorkspaceId};
use crate::tab_list::TabList;

/// The tab list text is not workspace → window → list of URL strings.
#[derive(Debug, Error)]
pub enum FormatError {
	#[error("failed to read tab list: {0}")]
	Io(#[from] std::io::Error),

	#[error("tab list is not valid JSON: {0}")]
	Syntax(#[from] serde_json::Error),

	#[error("{path}: expected {expected}, found {found}")]
	Shape {
		/// JSON path of the offending value, e.g. `$["1"]["0"][2]`.
		path: String,
		expected: Expected,
		found: &'static str,
	},
}

/// What a given level of the tab list must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
	Workspaces,
	Windows,
	UrlList,
	Url,
	/// A workspace or window key that appears once in its object.
	UniqueKey,
}

impl fmt::Display for Expected {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Expected::Workspaces => write!(f, "an object of workspaces"),
			Expected::Windows => write!(f, "an object of windows"),
			Expected::UrlList => write!(f, "an array of URLs"),
			Expected::Url => write!(f, "a URL string"),
			Expected::UniqueKey => write!(f, "a key used once"),
		}
	}
}

impl FormatError {
	fn shape(path: String, expected: Expected, found: &Node) -> Self {
		FormatError::Shape {
			path,
			expected,
			found: found.kind(),
		}
	}

	fn duplicate(path: String) -> Self {
		FormatError::Shape {
			path,
			expected: Expected::UniqueKey,
			found: "repeated key",
		}
	}
}

/// Generic JSON value that, unlike [`Value`], keeps repeated object keys.
#[derive(Debug)]
pub(crate) enum Node {
	Null,
	Bool,
	Number,
	String(String),
	Array(Vec<Node>),
	Object(Vec<(String, Node)>),
}

impl Node {
	fn kind(&self) -> &'static str {
		match self {
			Node::Null => "null",
			Node::Bool => "boolean",
			Node::Number => "number",
			Node::String(_) => "string",
			Node::Array(_) => "array",
			Node::Object(_) => "object",
		}
	}
}

impl<'de> Deserialize<'de> for Node {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(NodeVisitor)
	}
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
	type Value = Node;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("any JSON value")
	}

	fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
		Ok(Node::Null)
	}

	fn visit_bool<E: de::Error>(self, _: bool) -> Result<Node, E> {
		Ok(Node::Bool)
	}

	fn visit_i64<E: de::Error>(self, _: i64) -> Result<Node, E> {
		Ok(Node::Number)
	}

	fn visit_u64<E: de::Error>(self, _: u64) -> Result<Node, E> {
		Ok(Node::Number)
	}

	fn visit_f64<E: de::Error>(self, _: f64) -> Result<Node, E> {
		Ok(Node::Number)
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
		Ok(Node::String(v.to_string()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
		Ok(Node::String(v))
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element()? {
			items.push(item);
		}
		Ok(Node::Array(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
		let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
		while let Some((key, value)) = map.next_entry::<String, Node>()? {
			members.push((key, value));
		}
		Ok(Node::Object(members))
	}
}

impl<'de> Deserialize<'de> for TabList {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let node = Node::deserialize(deserializer)?;
		tab_list_from_node(&node).map_err(de::Error::custom)
	}
}

pub(crate) fn tab_list_from_node(node: &Node) -> Result<TabList, FormatError> {
	let Node::Object(workspaces) = node else {
		return Err(FormatError::shape("$".to_string(), Expected::Workspaces, node));
	};

	let mut list = TabList::new();
	let mut seen_workspaces = HashSet::new();
	for (workspace, windows_node) in workspaces {
		let workspace_path = format!("$[{}]", quoted(workspace));
		if !seen_workspaces.insert(workspace.as_str()) {
			return Err(FormatError::duplicate(workspace_path));
		}
		let Node::Object(windows) = windows_node else {
			return Err(FormatError::shape(workspace_path, Expected::Windows, windows_node));
		};

		let entry = list.workspace_entry(WorkspaceId::from(workspace.as_str()));
		let mut seen_windows = HashSet::new();
		for (window, urls_node) in windows {
			let window_path = format!("{workspace_path}[{}]", quoted(window));
			if !seen_windows.insert(window.as_str()) {
				return Err(FormatError::duplicate(window_path));
			}
			let Node::Array(items) = urls_node else {
				return Err(FormatError::shape(window_path, Expected::UrlList, urls_node));
			};

			let mut urls = Vec::with_capacity(items.len());
			for (index, item) in items.iter().enumerate() {
				match item {
					Node::String(url) => urls.push(url.clone()),
					other => {
						return Err(FormatError::shape(format!("{window_path}[{index}]"), Expected::Url, other));
					}
				}
			}
			entry.insert(WindowId::from(window.as_str()), urls);
		}
	}

	Ok(list)
}

fn quoted(key: &str) -> String {
	Value::String(key.to_string()).to_string()
}
