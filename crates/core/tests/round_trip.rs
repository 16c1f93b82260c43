//! Discover a profile, capture its tabs, write them out, read them back and
//! restore them with a dry-run actuator.

use std::fs;
use std::path::Path;

use ftl::extract::{self, Selection};
use ftl::restore::{PlanActuator, PlannedCall, Restorer};
use ftl::{TabList, mozlz4, source};
use tempfile::TempDir;

const SESSION: &str = r#"{
	"version": ["sessionrestore", 1],
	"windows": [
		{"workspaceID": "0", "tabs": [
			{"entries": [{"url": "https://docs.rs"}], "index": 1},
			{"entries": [{"url": "https://crates.io"}, {"url": "https://crates.io/crates/serde"}], "index": 2}
		]},
		{"workspaceID": "3", "tabs": []},
		{"workspaceID": "0", "tabs": [{"entries": [{"url": "https://www.rust-lang.org"}], "index": 1}]}
	]
}"#;

fn write_profile(root: &Path, name: &str, session: &str) {
	let backups = root.join(name).join("sessionstore-backups");
	fs::create_dir_all(&backups).unwrap();
	fs::write(backups.join("recovery.jsonlz4"), mozlz4::encode(session.as_bytes())).unwrap();
}

#[tokio::test]
async fn capture_and_restore_round_trip() {
	let firefox = TempDir::new().unwrap();
	write_profile(firefox.path(), "x1y2z3.default-release", SESSION);

	let source = source::discover(firefox.path(), source::DEFAULT_PROFILE_PATTERN).unwrap();
	let captured = extract::extract(&source, &Selection::all()).unwrap();

	let text = captured.to_json_pretty().unwrap();
	let parsed = TabList::from_json_str(&text).unwrap();
	assert_eq!(parsed, captured);
	assert_eq!(
		parsed.window("0", "0").unwrap(),
		["https://docs.rs", "https://crates.io/crates/serde"]
	);
	assert_eq!(parsed.window("0", "1").unwrap(), ["https://www.rust-lang.org"]);
	assert!(parsed.window("3", "0").unwrap().is_empty());

	let restorer = Restorer::new(PlanActuator::new());
	let report = restorer.restore(&parsed).await.into_result().unwrap();
	assert_eq!(report.restored.len(), 3);

	let calls = restorer.actuator().calls();
	let creates = calls
		.iter()
		.filter(|call| matches!(call, PlannedCall::CreateWindow { .. }))
		.count();
	let tabs: Vec<&str> = calls
		.iter()
		.filter_map(|call| match call {
			PlannedCall::OpenTab { url, .. } => Some(url.as_str()),
			_ => None,
		})
		.collect();
	assert_eq!(creates, 3);
	assert_eq!(
		tabs,
		["https://docs.rs", "https://crates.io/crates/serde", "https://www.rust-lang.org"]
	);
}

#[test]
fn workspace_filter_on_discovered_profile() {
	let firefox = TempDir::new().unwrap();
	write_profile(firefox.path(), "x1y2z3.default", SESSION);

	let source = source::discover(firefox.path(), source::DEFAULT_PROFILE_PATTERN).unwrap();
	let tabs = extract::extract(&source, &Selection::workspace("3").with_workspace("5")).unwrap();

	assert_eq!(tabs.workspace_ids().count(), 2);
	assert!(tabs.window("3", "0").unwrap().is_empty());
	assert!(tabs.workspace("5").unwrap().is_empty());
	assert!(!tabs.contains_workspace("0"));
}
