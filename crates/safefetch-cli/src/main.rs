use safefetch_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the state dir; fall back to stderr so an unwritable dir doesn't abort.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("safefetch error: {:#}", err);
        std::process::exit(1);
    }
}
