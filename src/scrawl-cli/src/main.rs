use std::process::ExitCode;

use clap::Parser;
use scrawl_cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match scrawl_cli::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("scrawl: {err:#}");
            ExitCode::FAILURE
        }
    }
}
