//! Command line front end for ftl.
//!
//! `ftl dump` captures a Firefox session as a tab list, `ftl restore`
//! recreates its windows, `ftl workspace` prints the current desktop.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod styles;
pub mod wm;
