use std::path::PathBuf;

use ftl::ActuatorError;
use ftl_protocol::FormatError;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, FtlError>;

#[derive(Debug, Error)]
pub enum FtlError {
	/// Command failed but its report has already been printed.
	/// Used to signal exit code 1 without additional output.
	#[error("")]
	OutputAlreadyPrinted,

	#[error(transparent)]
	Ftl(#[from] ftl::Error),

	#[error("configuration error in {}: {message}", path.display())]
	Config { path: PathBuf, message: String },

	#[error("window manager: {0}")]
	WindowManager(#[from] ActuatorError),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl From<FormatError> for FtlError {
	fn from(err: FormatError) -> Self {
		FtlError::Ftl(ftl::Error::Format(err))
	}
}

impl FtlError {
	/// Check if this error indicates output has already been printed.
	/// When true, the caller should exit with code 1 without printing additional output.
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, FtlError::OutputAlreadyPrinted)
	}

	pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
		FtlError::Config {
			path: path.into(),
			message: message.into(),
		}
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			FtlError::OutputAlreadyPrinted => (ErrorCode::InternalError, String::new(), None),
			FtlError::Ftl(err) => core_error(err),
			FtlError::Config { path, .. } => (
				ErrorCode::ConfigError,
				self.to_string(),
				Some(serde_json::json!({ "path": path })),
			),
			FtlError::WindowManager(_) => (ErrorCode::WindowManagerError, self.to_string(), None),
			FtlError::InvalidInput(msg) => (ErrorCode::InvalidInput, msg.clone(), None),
			FtlError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			FtlError::Json(err) => (ErrorCode::InternalError, format!("JSON error: {err}"), None),
		};

		CommandError { code, message, details }
	}
}

fn core_error(err: &ftl::Error) -> (ErrorCode, String, Option<serde_json::Value>) {
	let message = err.to_string();
	match err {
		ftl::Error::SourceNotFound { path, .. } => (
			ErrorCode::SourceNotFound,
			message,
			Some(serde_json::json!({ "path": path })),
		),
		ftl::Error::SessionParse { path, .. } => (
			ErrorCode::SessionParseFailed,
			message,
			Some(serde_json::json!({ "path": path })),
		),
		ftl::Error::Format(FormatError::Shape { path, .. }) => (
			ErrorCode::InvalidFormat,
			message,
			Some(serde_json::json!({ "jsonPath": path })),
		),
		ftl::Error::Format(FormatError::Io(_)) => (ErrorCode::IoError, message, None),
		ftl::Error::Format(_) => (ErrorCode::InvalidFormat, message, None),
		ftl::Error::Restoration { attempted, failures } => (
			ErrorCode::RestorationFailed,
			message,
			Some(serde_json::json!({ "attempted": attempted, "failed": failures })),
		),
	}
}
