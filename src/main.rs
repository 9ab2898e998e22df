//! Rungs CLI binary.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use rungs::cli::args::*;
use rungs::cli::commands::*;

fn main() -> ExitCode {
    // Parse command line arguments using clap
    let args = RungsArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    // Logs go to stderr; stdout is reserved for command output.
    Builder::new()
        .filter_level(log_level)
        .parse_env("RUNGS_LOG")
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    match execute_command(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
