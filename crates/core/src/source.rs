//! Locating a profile's session file on disk.
//!
//! A profile directory is recognized by the first of [`SESSION_FILES`] that
//! exists and carries the `mozLz4` header. Discovery scans a profile root
//! (usually `~/.mozilla/firefox`) and picks the profile whose session file
//! was written most recently.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::mozlz4;

/// Profile directory names Firefox generates: `<salt>.default`,
/// `<salt>.default-release`, ...
pub const DEFAULT_PROFILE_PATTERN: &str = "*.default*";

/// Session files inside a profile, most current first.
pub const SESSION_FILES: [&str; 3] = [
	"sessionstore-backups/recovery.jsonlz4",
	"sessionstore-backups/recovery.baklz4",
	"sessionstore.jsonlz4",
];

/// How to find the session source.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
	/// Use exactly this profile directory.
	Explicit(&'a Path),
	/// Pick the most recently active profile under `profile_root` whose
	/// directory name matches the glob `pattern`.
	Discover { profile_root: &'a Path, pattern: &'a str },
}

/// A profile directory holding a recognizable session file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSource {
	root: PathBuf,
	session_file: PathBuf,
	last_modified: SystemTime,
	readable: bool,
}

impl SessionSource {
	/// Inspect `root` for a session file.
	///
	/// Returns `None` when no candidate file exists with the `mozLz4`
	/// header. A file that exists but cannot be opened is returned with
	/// [`is_readable`](Self::is_readable) set to false.
	pub fn probe(root: &Path) -> Option<Self> {
		for relative in SESSION_FILES {
			let session_file = root.join(relative);
			let Ok(metadata) = fs::metadata(&session_file) else {
				continue;
			};
			if !metadata.is_file() {
				continue;
			}

			let last_modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
			let mut header = [0u8; 8];
			let readable = match File::open(&session_file).and_then(|mut file| file.read_exact(&mut header)) {
				Ok(()) => {
					if !mozlz4::has_magic(&header) {
						debug!(path = %session_file.display(), "skipping file without mozLz4 header");
						continue;
					}
					true
				}
				Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
					debug!(path = %session_file.display(), "skipping truncated session file");
					continue;
				}
				Err(err) => {
					debug!(path = %session_file.display(), error = %err, "session file not readable");
					false
				}
			};

			return Some(Self {
				root: root.to_path_buf(),
				session_file,
				last_modified,
				readable,
			});
		}
		None
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn session_file(&self) -> &Path {
		&self.session_file
	}

	pub fn last_modified(&self) -> SystemTime {
		self.last_modified
	}

	pub fn is_readable(&self) -> bool {
		self.readable
	}
}

pub fn locate(lookup: Lookup<'_>) -> Result<SessionSource> {
	match lookup {
		Lookup::Explicit(dir) => open_explicit(dir),
		Lookup::Discover { profile_root, pattern } => discover(profile_root, pattern),
	}
}

/// Validate an explicitly given profile directory.
pub fn open_explicit(dir: &Path) -> Result<SessionSource> {
	match fs::metadata(dir) {
		Ok(metadata) if metadata.is_dir() => {}
		Ok(_) => return Err(Error::source_not_found(dir, "not a directory")),
		Err(err) => return Err(Error::source_not_found(dir, err.to_string())),
	}

	let source = SessionSource::probe(dir).ok_or_else(|| {
		Error::source_not_found(dir, format!("no session file found (looked for {})", SESSION_FILES.join(", ")))
	})?;
	if !source.is_readable() {
		return Err(Error::source_not_found(
			dir,
			format!("{} is not readable", source.session_file().display()),
		));
	}

	info!(path = %source.session_file().display(), "using session file");
	Ok(source)
}

/// All readable session sources under `profile_root` whose directory name
/// matches `pattern`, in directory order.
pub fn candidates(profile_root: &Path, pattern: &str) -> Result<Vec<SessionSource>> {
	let matcher = glob::Pattern::new(pattern)
		.map_err(|err| Error::source_not_found(profile_root, format!("invalid profile pattern `{pattern}`: {err}")))?;
	let entries = fs::read_dir(profile_root)
		.map_err(|err| Error::source_not_found(profile_root, format!("cannot read profile root: {err}")))?;

	let mut found = Vec::new();
	for entry in entries.flatten() {
		let path = entry.path();
		let name = entry.file_name();
		if !path.is_dir() || !matcher.matches(&name.to_string_lossy()) {
			continue;
		}

		match SessionSource::probe(&path) {
			Some(source) if source.is_readable() => {
				debug!(profile = %path.display(), modified = ?source.last_modified(), "session candidate");
				found.push(source);
			}
			Some(_) => debug!(profile = %path.display(), "ignoring unreadable session file"),
			None => debug!(profile = %path.display(), "no session file in profile"),
		}
	}
	Ok(found)
}

/// Pick the profile with the most recently modified session file.
///
/// Ties go to the lexicographically greatest profile path, so the choice is
/// stable across runs.
pub fn discover(profile_root: &Path, pattern: &str) -> Result<SessionSource> {
	let source = candidates(profile_root, pattern)?
		.into_iter()
		.max_by(|a, b| {
			a.last_modified
				.cmp(&b.last_modified)
				.then_with(|| a.root.cmp(&b.root))
		})
		.ok_or_else(|| {
			Error::source_not_found(
				profile_root,
				format!("no profile matching `{pattern}` contains a session file"),
			)
		})?;

	info!(
		profile = %source.root().display(),
		path = %source.session_file().display(),
		"discovered session file"
	);
	Ok(source)
}
