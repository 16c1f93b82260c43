//! Error types for locating, decoding and restoring sessions.

use std::path::PathBuf;

use ftl_protocol::FormatError;
use thiserror::Error;

use crate::restore::WindowFailure;

/// Result type alias for ftl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the capture/restore pipeline.
#[derive(Debug, Error)]
pub enum Error {
	/// No usable session source could be determined.
	#[error("no session source at {}: {reason}", path.display())]
	SourceNotFound { path: PathBuf, reason: String },

	/// A session source was found but its content could not be decoded.
	#[error("failed to decode session data in {}: {source}", path.display())]
	SessionParse {
		path: PathBuf,
		#[source]
		source: DecodeError,
	},

	/// Tab list text does not have the workspace → window → URLs shape.
	#[error("invalid tab list: {0}")]
	Format(#[from] FormatError),

	/// One or more windows could not be restored. The others were.
	#[error("{}", restoration_summary(*attempted, failures))]
	Restoration { attempted: usize, failures: Vec<WindowFailure> },
}

/// Why session bytes could not be turned into a session.
#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("failed to read session file: {0}")]
	Io(#[from] std::io::Error),

	#[error("not a mozLz4 file (missing `mozLz40` header)")]
	BadMagic,

	#[error("mozLz4 file truncated after {0} bytes")]
	Truncated(usize),

	#[error("declared decompressed size of {0} bytes exceeds the {max} byte limit", max = crate::mozlz4::MAX_DECODED_LEN)]
	TooLarge(usize),

	#[error("corrupt LZ4 block: {0}")]
	Lz4(#[from] lz4_flex::block::DecompressError),

	#[error("session JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("unsupported session format `{0}`")]
	UnsupportedVersion(String),
}

impl Error {
	pub fn source_not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
		Error::SourceNotFound {
			path: path.into(),
			reason: reason.into(),
		}
	}

	pub fn session_parse(path: impl Into<PathBuf>, source: impl Into<DecodeError>) -> Self {
		Error::SessionParse {
			path: path.into(),
			source: source.into(),
		}
	}

	/// Failed (workspace, window) pairs, for a [`Error::Restoration`].
	pub fn failed_windows(&self) -> &[WindowFailure] {
		match self {
			Error::Restoration { failures, .. } => failures,
			_ => &[],
		}
	}
}

fn restoration_summary(attempted: usize, failures: &[WindowFailure]) -> String {
	let listed: Vec<String> = failures.iter().map(ToString::to_string).collect();
	format!(
		"failed to restore {} of {attempted} window(s): {}",
		failures.len(),
		listed.join("; ")
	)
}
