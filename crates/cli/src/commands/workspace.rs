//! `ftl workspace`: print the current workspace id.

use std::time::Instant;

use crate::config::Settings;
use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};
use crate::wm::Wmctrl;

pub async fn run(settings: &Settings, format: OutputFormat) -> Result<()> {
	let start = Instant::now();
	let current = Wmctrl::locate(&settings.wmctrl_command)?.current_desktop().await?;

	let result = ResultBuilder::new("workspace")
		.started_at(start)
		.data(current.into_inner())
		.build();
	print_result(&result, format);
	Ok(())
}
