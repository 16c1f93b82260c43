//! `ftl restore`: reopen the windows of a tab list.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::time::{Duration, Instant};

use colored::Colorize;
use ftl::extract::UNASSIGNED_WORKSPACE;
use ftl::restore::{PlanActuator, PlannedCall};
use ftl::{Actuator, RestoreOptions, RestoreReport, Restorer, TabList};
use serde::Serialize;
use tracing::info;

use crate::cli::{RestoreArgs, is_stdio};
use crate::config::Settings;
use crate::error::{FtlError, Result};
use crate::output::{
	CommandResult, DiagnosticLevel, OutputFormat, ResultBuilder, print_error_stderr, print_result,
	write_diagnostics_text,
};
use crate::wm::{FirefoxActuator, Wmctrl, resolve_program};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreData {
	pub dry_run: bool,
	pub windows: usize,
	pub tabs: usize,
	#[serde(flatten)]
	pub report: RestoreReport,
	/// Calls a real restore would make; only filled for dry runs.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub plan: Vec<PlannedCall>,
}

pub async fn run(args: RestoreArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
	let start = Instant::now();
	let tabs = read_tab_list(&args.source)?;
	let options = options(&args, settings);
	info!(target = "ftl_cli", source = %args.source, windows = tabs.window_count(), dry_run = args.dry_run, "restore");

	let (report, plan) = if args.dry_run {
		let restorer = Restorer::new(PlanActuator::new()).with_options(options);
		let report = restorer.restore(&tabs).await;
		(report, restorer.actuator().take_calls())
	} else {
		let wmctrl = Wmctrl::locate(&settings.wmctrl_command)?;
		let firefox = resolve_program(&settings.firefox_command)?;
		let actuator = FirefoxActuator::new(wmctrl, firefox)
			.window_class(settings.window_class.as_str())
			.settle(settings.settle());
		(restore_with(actuator, options, &tabs).await, Vec::new())
	};

	let failure = report.clone().into_result().err().map(FtlError::from);
	let data = RestoreData {
		dry_run: args.dry_run,
		windows: tabs.window_count(),
		tabs: tabs.tab_count(),
		report,
		plan,
	};

	let mut builder = ResultBuilder::new("restore").started_at(start).data(data);
	for (level, message) in diagnostics(&tabs, args.dry_run) {
		builder = builder.diagnostic(level, message);
	}
	if let Some(err) = &failure {
		builder = builder.command_error(err.to_command_error());
	}
	let result = builder.build();

	if format == OutputFormat::Text {
		let mut stdout = io::stdout().lock();
		write_report_text(&mut stdout, &result)?;
	} else {
		print_result(&result, format);
	}

	match failure {
		Some(err) => {
			print_error_stderr(&err.to_command_error());
			Err(FtlError::OutputAlreadyPrinted)
		}
		None => Ok(()),
	}
}

async fn restore_with<A: Actuator>(actuator: A, options: RestoreOptions, tabs: &TabList) -> RestoreReport {
	Restorer::new(actuator).with_options(options).restore(tabs).await
}

fn options(args: &RestoreArgs, settings: &Settings) -> RestoreOptions {
	let concurrency = args
		.concurrency
		.map(|n| usize::try_from(n).unwrap_or(usize::MAX))
		.unwrap_or(settings.concurrency);
	let call_timeout = match args.timeout_ms {
		Some(0) => None,
		Some(ms) => Some(Duration::from_millis(ms)),
		None => settings.call_timeout(),
	};

	RestoreOptions {
		concurrency: concurrency.max(1),
		call_timeout,
	}
}

fn read_tab_list(source: &str) -> Result<TabList> {
	if is_stdio(source) {
		return Ok(TabList::from_reader(io::stdin().lock())?);
	}
	let file = File::open(source).map_err(|err| FtlError::InvalidInput(format!("cannot read tab list {source}: {err}")))?;
	Ok(TabList::from_reader(BufReader::new(file))?)
}

fn diagnostics(tabs: &TabList, dry_run: bool) -> Vec<(DiagnosticLevel, String)> {
	let mut out = Vec::new();
	if dry_run {
		out.push((DiagnosticLevel::Info, "dry run: no windows were opened".to_string()));
	}
	if let Some(windows) = tabs.workspace(UNASSIGNED_WORKSPACE) {
		out.push((
			DiagnosticLevel::Warning,
			format!(
				"{} window(s) under `{UNASSIGNED_WORKSPACE}` were saved without a workspace id and cannot be moved to one",
				windows.len()
			),
		));
	}
	out
}

/// One line per window with a colored status marker.
pub fn write_report_text<W: Write>(out: &mut W, result: &CommandResult<RestoreData>) -> io::Result<()> {
	if let Some(data) = &result.data {
		if data.dry_run {
			for call in &data.plan {
				writeln!(out, "{} {}", "plan".cyan(), describe(call))?;
			}
		}
		for window in &data.report.restored {
			writeln!(
				out,
				"{} {}/{} ({} tabs)",
				"ok".green().bold(),
				window.workspace,
				window.window,
				window.tabs
			)?;
		}
		for failure in &data.report.failed {
			writeln!(out, "{} {failure}", "failed".red().bold())?;
		}
	}

	write_diagnostics_text(out, &result.diagnostics)
}

fn describe(call: &PlannedCall) -> String {
	match call {
		PlannedCall::CreateWindow { window } => format!("create {window}"),
		PlannedCall::OpenTab { window, url } => format!("open {url} in {window}"),
		PlannedCall::AssignWorkspace { window, workspace } => format!("move {window} to workspace {workspace}"),
	}
}

#[cfg(test)]
mod tests {
	use ftl::restore::{RestoredWindow, Stage, WindowFailure};

	use super::*;

	fn data(report: RestoreReport) -> RestoreData {
		RestoreData {
			dry_run: false,
			windows: report.attempted(),
			tabs: 3,
			report,
			plan: Vec::new(),
		}
	}

	fn report() -> RestoreReport {
		RestoreReport {
			restored: vec![RestoredWindow {
				workspace: "1".into(),
				window: "0".into(),
				handle: "window-0".into(),
				tabs: 2,
			}],
			failed: vec![WindowFailure {
				workspace: "2".into(),
				window: "0".into(),
				stage: Stage::AssignWorkspace,
				reason: "timed out after 10s".into(),
			}],
		}
	}

	#[test]
	fn options_prefer_flags_over_settings() {
		let settings = Settings::default();
		let args = RestoreArgs {
			concurrency: Some(3),
			timeout_ms: Some(0),
			..Default::default()
		};

		let opts = options(&args, &settings);
		assert_eq!(opts.concurrency, 3);
		assert_eq!(opts.call_timeout, None);

		let opts = options(&RestoreArgs::default(), &settings);
		assert_eq!(opts, RestoreOptions::default());
	}

	#[test]
	fn data_flattens_report() {
		let value = serde_json::to_value(data(report())).unwrap();

		assert_eq!(value["dryRun"], false);
		assert_eq!(value["windows"], 2);
		assert_eq!(value["restored"][0]["handle"], "window-0");
		assert_eq!(value["failed"][0]["stage"]["kind"], "assignWorkspace");
		assert!(value.get("plan").is_none());
	}

	#[test]
	fn text_report_marks_each_window() {
		colored::control::set_override(false);
		let result = ResultBuilder::new("restore").data(data(report())).build();

		let mut out = Vec::new();
		write_report_text(&mut out, &result).unwrap();
		let text = String::from_utf8(out).unwrap();

		assert_eq!(
			text,
			"ok 1/0 (2 tabs)\nfailed 2/0 (assign workspace: timed out after 10s)\n"
		);
	}

	#[test]
	fn unreadable_source_is_invalid_input() {
		let err = read_tab_list("/nonexistent/tabs.json").unwrap_err();
		assert!(matches!(err, FtlError::InvalidInput(_)));
	}

	#[test]
	fn source_file_is_shape_checked() {
		let tmp = tempfile::TempDir::new().unwrap();
		let path = tmp.path().join("tabs.json");
		std::fs::write(&path, r#"{"1": {"0": ["https://a.example/"]}, "1": {}}"#).unwrap();

		let err = read_tab_list(path.to_str().unwrap()).unwrap_err();
		assert_eq!(err.to_command_error().code, crate::output::ErrorCode::InvalidFormat);
	}

	#[test]
	fn diagnostics_flag_dry_runs_and_unassigned_windows() {
		let tabs = TabList::from_json_str(r#"{"unassigned": {"0": [], "1": []}, "1": {"0": []}}"#).unwrap();

		let diags = diagnostics(&tabs, true);
		assert_eq!(diags.len(), 2);
		assert_eq!(diags[0].0, DiagnosticLevel::Info);
		assert_eq!(diags[1].0, DiagnosticLevel::Warning);
		assert!(diags[1].1.starts_with("2 window(s) under `unassigned`"));

		let plain = TabList::from_json_str(r#"{"1": {"0": []}}"#).unwrap();
		assert!(diagnostics(&plain, false).is_empty());
	}

	#[test]
	fn text_report_lists_diagnostics() {
		colored::control::set_override(false);
		let result = ResultBuilder::new("restore")
			.data(data(RestoreReport::default()))
			.diagnostic(DiagnosticLevel::Info, "dry run: no windows were opened")
			.build();

		let mut out = Vec::new();
		write_report_text(&mut out, &result).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "[info] dry run: no windows were opened\n");
	}
}
