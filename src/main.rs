use clap::Parser;
use flowpatch::cli::{self, Args};
use flowpatch::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match logging::init(&args) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("flowpatch: failed to initialize logging: {:#}", err);
            return ExitCode::from(cli::EXIT_FATAL);
        }
    };

    match cli::run(args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("flowpatch: {:#}", err);
            ExitCode::from(cli::EXIT_FATAL)
        }
    }
}
