//! Structured result envelope for `restore` and `workspace`.
//!
//! `dump` never uses it: its stdout is the tab list itself, so it can be
//! piped straight into `ftl restore`.
//!
//! ## Output Contract
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": true,
//!   "command": "restore",
//!   "data": { ... },
//!   "timings": { "durationMs": 412 }
//! }
//! ```
//!
//! On failure `ok` is false and `error` holds a stable code:
//!
//! ```json
//! {
//!   "ok": false,
//!   "command": "restore",
//!   "data": { "restored": [...], "failed": [...] },
//!   "error": { "code": "RESTORATION_FAILED", "message": "failed to restore 1 of 2 window(s): ..." }
//! }
//! ```

#[cfg(test)]
mod tests;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Current schema version for command output.
pub const SCHEMA_VERSION: u32 = 1;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text (default)
	#[default]
	Text,
	/// JSON output
	Json,
	/// Newline-delimited JSON
	Ndjson,
	/// TOON output (token-efficient for LLMs)
	Toon,
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
			OutputFormat::Ndjson => write!(f, "ndjson"),
			OutputFormat::Toon => write!(f, "toon"),
		}
	}
}

/// The result envelope printed by `restore` and `workspace`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,

	pub ok: bool,

	pub command: String,

	/// Command-specific data. `restore` keeps its report here even when
	/// some windows failed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub diagnostics: Vec<Diagnostic>,
}

/// Error information for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,

	pub message: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// No profile or session file could be found
	SourceNotFound,
	/// The session file exists but could not be decoded
	SessionParseFailed,
	/// Tab list text is not workspace → window → URLs
	InvalidFormat,
	/// Some windows could not be restored
	RestorationFailed,
	/// wmctrl/firefox could not be run or reported an error
	WindowManagerError,
	/// Config file unreadable or malformed
	ConfigError,
	InvalidInput,
	IoError,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let code = match self {
			ErrorCode::SourceNotFound => "SOURCE_NOT_FOUND",
			ErrorCode::SessionParseFailed => "SESSION_PARSE_FAILED",
			ErrorCode::InvalidFormat => "INVALID_FORMAT",
			ErrorCode::RestorationFailed => "RESTORATION_FAILED",
			ErrorCode::WindowManagerError => "WINDOW_MANAGER_ERROR",
			ErrorCode::ConfigError => "CONFIG_ERROR",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		};
		f.write_str(code)
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
	pub level: DiagnosticLevel,

	pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
	Info,
	Warning,
}

/// Builder for constructing command results
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Instant,
	diagnostics: Vec<Diagnostic>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start_time: Instant::now(),
			diagnostics: Vec::new(),
		}
	}

	/// Measure the duration from `start` instead of from builder creation.
	pub fn started_at(mut self, start: Instant) -> Self {
		self.start_time = start;
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error_with_optional_details(code, message, None)
	}

	pub fn error_with_optional_details(
		mut self,
		code: ErrorCode,
		message: impl Into<String>,
		details: Option<serde_json::Value>,
	) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
			details,
		});
		self
	}

	pub fn command_error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn diagnostic(mut self, level: DiagnosticLevel, message: impl Into<String>) -> Self {
		self.diagnostics.push(Diagnostic {
			level,
			message: message.into(),
		});
		self
	}

	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();

		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok,
			command: self.command,
			data: self.data,
			error: self.error,
			timings: Some(Timings::from(self.start_time.elapsed())),
			diagnostics: self.diagnostics,
		}
	}
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Toon => {
			if let Ok(json_value) = serde_json::to_value(result) {
				println!("{}", toon::encode(&json_value, None));
			}
		}
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => {
			let mut stdout = io::stdout().lock();
			let _ = write_result_text(&mut stdout, result);
		}
	}
}

/// Human-readable rendering.
///
/// String data is printed bare so `$(ftl workspace)` yields just the id.
pub fn write_result_text<T: Serialize, W: Write>(out: &mut W, result: &CommandResult<T>) -> io::Result<()> {
	if let Some(ref data) = result.data {
		match serde_json::to_value(data) {
			Ok(serde_json::Value::String(text)) => writeln!(out, "{text}")?,
			Ok(value) => {
				if let Ok(json) = serde_json::to_string_pretty(&value) {
					writeln!(out, "{json}")?;
				}
			}
			Err(_) => {}
		}
	}

	if let Some(ref error) = result.error {
		writeln!(out, "{} [{}]: {}", "Error".red().bold(), error.code, error.message)?;
	}

	write_diagnostics_text(out, &result.diagnostics)
}

pub fn write_diagnostics_text<W: Write>(out: &mut W, diagnostics: &[Diagnostic]) -> io::Result<()> {
	for diag in diagnostics {
		let prefix = match diag.level {
			DiagnosticLevel::Info => "info".normal(),
			DiagnosticLevel::Warning => "warning".yellow(),
		};
		writeln!(out, "[{prefix}] {}", diag.message)?;
	}
	Ok(())
}

/// Print an error to stderr in human-readable format
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "Error".red().bold(), error.code, error.message);
}
