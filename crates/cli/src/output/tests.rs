use serde_json::json;

use super::*;

#[derive(Debug, Serialize)]
struct WindowCount {
	windows: usize,
}

fn text_of<T: Serialize>(result: &CommandResult<T>) -> String {
	colored::control::set_override(false);
	let mut buf = Vec::new();
	write_result_text(&mut buf, result).unwrap();
	String::from_utf8(buf).unwrap()
}

#[test]
fn result_builder_success() {
	let result = ResultBuilder::new("restore").data(WindowCount { windows: 2 }).build();

	assert!(result.ok);
	assert_eq!(result.command, "restore");
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
	assert!(result.error.is_none());
	assert!(result.timings.is_some());
}

#[test]
fn result_builder_error_keeps_data() {
	let result = ResultBuilder::new("restore")
		.data(WindowCount { windows: 1 })
		.error(ErrorCode::RestorationFailed, "failed to restore 1 of 2 window(s)")
		.build();

	assert!(!result.ok);
	assert!(result.data.is_some());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::RestorationFailed);
}

#[test]
fn result_without_data_is_not_ok() {
	let result: CommandResult<()> = ResultBuilder::new("workspace").build();
	assert!(!result.ok);
}

#[test]
fn envelope_serializes_camel_case() {
	let result = ResultBuilder::new("restore")
		.data(WindowCount { windows: 3 })
		.diagnostic(DiagnosticLevel::Warning, "dry run")
		.build();

	let value = serde_json::to_value(&result).unwrap();
	assert_eq!(value["schemaVersion"], 1);
	assert_eq!(value["ok"], true);
	assert_eq!(value["data"], json!({ "windows": 3 }));
	assert_eq!(value["diagnostics"][0]["level"], "warning");
	assert!(value["timings"]["durationMs"].is_u64());
	assert!(value.get("error").is_none());
}

#[test]
fn error_code_display_matches_serde() {
	for code in [
		ErrorCode::SourceNotFound,
		ErrorCode::SessionParseFailed,
		ErrorCode::InvalidFormat,
		ErrorCode::RestorationFailed,
		ErrorCode::WindowManagerError,
		ErrorCode::ConfigError,
	] {
		assert_eq!(serde_json::to_value(code).unwrap(), code.to_string());
	}
	assert_eq!(ErrorCode::SessionParseFailed.to_string(), "SESSION_PARSE_FAILED");
}

#[test]
fn output_format_values() {
	use clap::ValueEnum;

	assert_eq!(OutputFormat::from_str("json", false).unwrap(), OutputFormat::Json);
	assert_eq!(OutputFormat::from_str("TOON", true).unwrap(), OutputFormat::Toon);
	assert!(OutputFormat::from_str("yaml", true).is_err());
	assert_eq!(OutputFormat::default(), OutputFormat::Text);
	assert_eq!(OutputFormat::Ndjson.to_string(), "ndjson");
}

#[test]
fn text_prints_bare_strings() {
	let result = ResultBuilder::new("workspace").data("2".to_string()).build();
	assert_eq!(text_of(&result), "2\n");
}

#[test]
fn text_prints_error_and_diagnostics() {
	let result: CommandResult<()> = ResultBuilder::new("restore")
		.error(ErrorCode::InvalidFormat, "bad shape")
		.diagnostic(DiagnosticLevel::Info, "nothing opened")
		.build();

	assert_eq!(text_of(&result), "Error [INVALID_FORMAT]: bad shape\n[info] nothing opened\n");
}
