use std::process::ExitCode;

use clap::Args;
use log::error;

use cmdchain::application::{Application, DispatchError};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Command name, e.g. `foo:hello`
    name: String,

    /// Arguments passed to the command (not forwarded to chain runs)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

/// Dispatch a single command and turn the outcome into a process exit code.
pub fn run(args: &RunArgs, app: &Application) -> ExitCode {
    match app.run(&args.name, &args.args) {
        Ok(status) => status.into(),
        Err(DispatchError::Blocked(violation)) => {
            eprintln!("{violation}");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Dispatch of '{}' failed: {e}", args.name);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
