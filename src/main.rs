use std::process::ExitCode;

use sterad::cli::{execute, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    execute(&args)
}
