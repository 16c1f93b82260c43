//! Help output colors, matching cargo.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// Green bold section headers and usage, cyan for everything the user types
/// (`--flags`, `<PLACEHOLDERS>`, accepted values).
pub fn cli_styles() -> Styles {
	let typed = AnsiColor::Cyan.on_default();
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(typed)
		.placeholder(typed)
		.valid(typed)
		.invalid(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default().bold())
}
