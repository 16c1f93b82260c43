//! Capture the tabs of a Firefox session per workspace and window, and
//! restore them as fresh windows.
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Locate the profile's session file | [`source`] | [`SessionSource`] |
//! | Decode `mozLz4` + session JSON | [`mozlz4`], [`session`] | [`session::SessionState`] |
//! | Group and filter windows | [`extract`] | [`TabList`] |
//! | Recreate windows through an [`Actuator`] | [`restore`] | [`RestoreReport`] |
//!
//! # Example
//!
//! ```ignore
//! let source = ftl::source::discover(&firefox_dir, ftl::source::DEFAULT_PROFILE_PATTERN)?;
//! let tabs = ftl::extract::extract(&source, &Selection::workspace("1"))?;
//!
//! let report = Restorer::new(actuator).restore(&tabs).await.into_result()?;
//! ```

pub mod error;
pub mod extract;
pub mod mozlz4;
pub mod restore;
pub mod session;
pub mod source;

pub use error::{DecodeError, Error, Result};
pub use extract::Selection;
pub use ftl_protocol::{FormatError, TabList, WindowId, WindowSpec, WorkspaceEntry, WorkspaceId};
pub use restore::{Actuator, ActuatorError, RestoreOptions, RestoreReport, Restorer, WindowHandle};
pub use source::SessionSource;
