mod list;
mod run;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use cmdchain::load_config;

#[derive(Parser, Debug)]
#[command(name = "cmdchain", about = "Run commands and their configured chains", version)]
struct Cli {
    /// Path to config file (auto-detected if not specified)
    #[arg(short, long)]
    config: Option<String>,

    /// Log file path (receives info-level chain events)
    #[arg(long)]
    log_file: Option<String>,

    /// Increase console log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a command by name; parents also run their chain members
    Run(run::RunArgs),
    /// List all commands
    List,
    /// Show every command chain in execution order
    Chains,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    cmdchain::logger::init(cli.verbose, log_file, std::io::stderr().is_terminal())?;

    let config = load_config(cli.config.as_deref())?;
    let app = config.application();

    match cli.command {
        Commands::Run(ref args) => Ok(run::run(args, &app)),
        Commands::List => list::list(&app),
        Commands::Chains => list::chains(&app),
    }
}
