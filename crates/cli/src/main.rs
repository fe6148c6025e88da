use std::process::ExitCode;

use clap::Parser;

use spantry_cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    spantry_observability::init(cli.log_format);

    // Resolved here so the core never reads a clock.
    let today = chrono::Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();

    let result = match cli.command {
        Command::Item(command) => {
            spantry_cli::commands::run(command, &cli.data_file, today, &mut stdout)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
