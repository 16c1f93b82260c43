use clap::Parser;
use ftl_cli::{
	cli::Cli,
	commands,
	error::FtlError,
	logging,
	output::{self, OutputFormat, ResultBuilder},
};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli, format).await {
		// Restore reports are printed before their error is returned
		if !err.is_output_already_printed() {
			handle_error(command, err, format);
		}
		std::process::exit(1);
	}
}

fn handle_error(command: &'static str, err: FtlError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	output::print_error_stderr(&cmd_error);

	// Machine-readable formats also get an ok=false envelope on stdout.
	// `dump` keeps stdout for the tab list only.
	if format != OutputFormat::Text && command != "dump" {
		let result: output::CommandResult<()> = ResultBuilder::new(command)
			.error_with_optional_details(cmd_error.code, &cmd_error.message, cmd_error.details)
			.build();
		output::print_result(&result, format);
	}
}
