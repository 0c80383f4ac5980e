use std::process::ExitCode;

use clap::Parser;

use bugsink::cli::handlers::CommandContext;
use bugsink::cli::{self, Cli, output};
use bugsink::config::Config;
use bugsink::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = logging::init(verbose, cli.log_file.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|()| run(cli));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err.to_string());
            if verbose {
                eprintln!("{:?}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output_format();
    let config = Config::load()?;
    tracing::debug!(host = config.host(), project = ?config.project_id(), "resolved configuration");

    let mut ctx = CommandContext::new(config, format);
    cli::run(&mut ctx, cli.command)
}
