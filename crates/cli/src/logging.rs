use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8) {
	// 0 = warnings and errors (e.g. windows saved without a workspace id)
	// 1 (-v) = info for ftl crates: chosen profile, window counts
	// 2+ (-vv) = debug for everything, including every probed profile
	let filter = match verbosity {
		0 => "warn",
		1 => "warn,ftl=info,ftl_cli=info",
		_ => "debug",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	// stdout carries tab lists and result envelopes
	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}
