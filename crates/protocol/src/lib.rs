//! Interchange types for ftl tab lists.
//!
//! A tab list is the plain-text snapshot of a browser session, grouped as
//! workspace → window → ordered URLs:
//!
//! ```json
//! {
//!     "1": {
//!         "0": ["https://example.com", "https://www.rust-lang.org"],
//!         "1": []
//!     }
//! }
//! ```
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: no I/O beyond (de)serializing the text form
//! - **Exactly three levels deep**: anything else is a [`FormatError`]
//! - **Opaque ids**: workspace and window ids are tokens, never numbers
//!
//! Capturing and restoring sessions is built on top of these types in `ftl-rs`.

pub mod format;
pub mod ids;
pub mod tab_list;

pub use format::{Expected, FormatError};
pub use ids::{WindowId, WorkspaceId};
pub use tab_list::{TabList, WindowSpec, WorkspaceEntry};
