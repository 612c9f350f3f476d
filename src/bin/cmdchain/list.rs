use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use cmdchain::application::Application;
use cmdchain::listing::{render_chains, render_list};

/// Print every command with its description.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn list(app: &Application) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let color = std::io::stdout().is_terminal();
    std::io::stdout().write_all(render_list(app, color).as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

/// Print every chain parent followed by its members.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn chains(app: &Application) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let color = std::io::stdout().is_terminal();
    std::io::stdout().write_all(render_chains(app, color).as_bytes())?;
    Ok(ExitCode::SUCCESS)
}
