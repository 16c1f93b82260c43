//! Binary-level tests for `ftl dump` and `ftl restore --dry-run`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, SystemTime};

use serde_json::{Value, json};
use tempfile::TempDir;

fn ftl_binary() -> PathBuf {
	PathBuf::from(env!("CARGO_BIN_EXE_ftl"))
}

/// `ftl` with an empty config home so no user config leaks in.
fn ftl(config_home: &Path) -> Command {
	let mut cmd = Command::new(ftl_binary());
	cmd.env("XDG_CONFIG_HOME", config_home).env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

fn run_with_stdin(mut cmd: Command, stdin: &str) -> Output {
	let mut child = cmd
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("failed to execute ftl");
	child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
	child.wait_with_output().unwrap()
}

fn session() -> Value {
	json!({
		"version": ["sessionrestore", 1],
		"windows": [
			{
				"workspaceID": "1",
				"tabs": [
					{ "entries": [{ "url": "https://a.example/" }], "index": 1 },
					{ "entries": [{ "url": "https://b.example/old" }, { "url": "https://b.example/" }], "index": 2 }
				]
			},
			{
				"workspaceID": "2",
				"tabs": [{ "entries": [{ "url": "https://c.example/" }], "index": 1 }]
			}
		]
	})
}

fn write_profile(root: &Path, name: &str, session: &Value, modified: SystemTime) -> PathBuf {
	let profile = root.join(name);
	let backups = profile.join("sessionstore-backups");
	fs::create_dir_all(&backups).unwrap();

	let path = backups.join("recovery.jsonlz4");
	fs::write(&path, ftl::mozlz4::encode(session.to_string().as_bytes())).unwrap();
	fs::File::options().write(true).open(&path).unwrap().set_modified(modified).unwrap();
	profile
}

#[test]
fn dump_writes_tab_list_for_session_dir() {
	let tmp = TempDir::new().unwrap();
	let profile = write_profile(tmp.path(), "abcd.default", &session(), SystemTime::now());

	let output = ftl(tmp.path()).arg("dump").arg("--session-dir").arg(&profile).output().unwrap();
	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

	let stdout = String::from_utf8(output.stdout).unwrap();
	assert!(stdout.starts_with("{\n    \"1\": {\n        \"0\": [\n"));
	assert!(stdout.ends_with("}\n"));

	let tabs: Value = serde_json::from_str(&stdout).unwrap();
	assert_eq!(
		tabs,
		json!({
			"1": { "0": ["https://a.example/", "https://b.example/"] },
			"2": { "0": ["https://c.example/"] }
		})
	);
}

#[test]
fn dump_filters_by_workspace_into_target_file() {
	let tmp = TempDir::new().unwrap();
	let profile = write_profile(tmp.path(), "abcd.default", &session(), SystemTime::now());
	let target = tmp.path().join("tabs.json");

	let status = ftl(tmp.path())
		.args(["dump", "--workspace", "2", "--session-dir"])
		.arg(&profile)
		.arg("--target")
		.arg(&target)
		.status()
		.unwrap();
	assert!(status.success());

	let tabs: Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
	assert_eq!(tabs, json!({ "2": { "0": ["https://c.example/"] } }));
}

#[test]
fn dump_discovers_newest_profile() {
	let tmp = TempDir::new().unwrap();
	let firefox = tmp.path().join("firefox");
	let now = SystemTime::now();

	let mut stale = session();
	stale["windows"][0]["tabs"][0]["entries"][0]["url"] = json!("https://stale.example/");
	write_profile(&firefox, "old.default", &stale, now - Duration::from_secs(3600));
	write_profile(&firefox, "new.default-release", &session(), now);
	write_profile(&firefox, "other.dev-edition", &stale, now + Duration::from_secs(60));

	let output = ftl(tmp.path())
		.args(["dump", "--find-session-dir", "--firefox-dir"])
		.arg(&firefox)
		.output()
		.unwrap();
	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

	let tabs: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(tabs["1"]["0"][0], "https://a.example/");
}

#[test]
fn dump_without_profile_fails() {
	let tmp = TempDir::new().unwrap();

	let output = ftl(tmp.path()).args(["-f", "json", "dump"]).output().unwrap();
	assert_eq!(output.status.code(), Some(1));
	assert!(output.stdout.is_empty(), "dump keeps stdout for tab lists");
	assert!(String::from_utf8_lossy(&output.stderr).contains("[SOURCE_NOT_FOUND]"));
}

#[test]
fn dump_reports_corrupt_session() {
	let tmp = TempDir::new().unwrap();
	let profile = tmp.path().join("abcd.default");
	fs::create_dir_all(&profile).unwrap();
	let mut bytes = ftl::mozlz4::encode(session().to_string().as_bytes());
	bytes.truncate(bytes.len() - 6);
	fs::write(profile.join("sessionstore.jsonlz4"), bytes).unwrap();

	let output = ftl(tmp.path()).arg("dump").arg("--session-dir").arg(&profile).output().unwrap();
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("[SESSION_PARSE_FAILED]"));
}

#[test]
fn restore_dry_run_reports_plan() {
	let tmp = TempDir::new().unwrap();
	let tabs = r#"{"1": {"0": ["https://a.example/", "https://b.example/"]}, "2": {"0": []}}"#;

	let mut cmd = ftl(tmp.path());
	cmd.args(["-f", "json", "restore", "--dry-run"]);
	let output = run_with_stdin(cmd, tabs);
	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

	let result: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(result["ok"], true);
	assert_eq!(result["command"], "restore");
	assert_eq!(result["data"]["dryRun"], true);
	assert_eq!(result["data"]["windows"], 2);
	assert_eq!(result["data"]["tabs"], 2);
	assert_eq!(result["data"]["restored"].as_array().unwrap().len(), 2);

	let plan = result["data"]["plan"].as_array().unwrap();
	assert_eq!(plan.len(), 6);
	assert_eq!(plan[0], json!({ "call": "createWindow", "window": "planned-0" }));
}

#[test]
fn dump_output_feeds_restore() {
	let tmp = TempDir::new().unwrap();
	let profile = write_profile(tmp.path(), "abcd.default", &session(), SystemTime::now());

	let dumped = ftl(tmp.path()).arg("dump").arg("--session-dir").arg(&profile).output().unwrap();
	assert!(dumped.status.success());

	let mut cmd = ftl(tmp.path());
	cmd.args(["-f", "ndjson", "restore", "--dry-run", "--source", "-"]);
	let output = run_with_stdin(cmd, &String::from_utf8(dumped.stdout).unwrap());
	assert!(output.status.success());

	let stdout = String::from_utf8(output.stdout).unwrap();
	assert_eq!(stdout.lines().count(), 1);
	let result: Value = serde_json::from_str(&stdout).unwrap();
	assert_eq!(result["data"]["tabs"], 3);
}

#[test]
fn restore_rejects_malformed_tab_list() {
	let tmp = TempDir::new().unwrap();
	let source = tmp.path().join("tabs.json");
	fs::write(&source, r#"{"1": {"0": ["https://a.example/", {"url": "x"}]}}"#).unwrap();

	let output = ftl(tmp.path())
		.args(["-f", "json", "restore", "--dry-run", "--source"])
		.arg(&source)
		.output()
		.unwrap();
	assert_eq!(output.status.code(), Some(1));

	let result: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(result["ok"], false);
	assert_eq!(result["error"]["code"], "INVALID_FORMAT");
	assert_eq!(result["error"]["details"]["jsonPath"], "$[\"1\"][\"0\"][1]");
}

#[test]
fn malformed_config_is_reported() {
	let tmp = TempDir::new().unwrap();
	let config = tmp.path().join("ftl.json");
	fs::write(&config, "{ not json").unwrap();

	let output = ftl(tmp.path())
		.args(["-f", "json", "--config"])
		.arg(&config)
		.args(["restore", "--dry-run"])
		.stdin(Stdio::null())
		.output()
		.unwrap();
	assert_eq!(output.status.code(), Some(1));

	let result: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(result["error"]["code"], "CONFIG_ERROR");
}
