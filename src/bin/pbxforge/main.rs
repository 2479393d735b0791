//! pbxforge CLI - generate and patch Xcode project manifests

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use pbxforge::util::shell::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("pbxforge=debug")
    } else {
        EnvFilter::new("pbxforge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color, cli.json);

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &shell),
        Commands::Patch(args) => commands::patch::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
