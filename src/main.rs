//! Wavedit CLI
//!
//! Command-line interface for the Wavedit audio editing engine.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use wavedit::cli::commands::{self, EditCommand};
use wavedit::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("Wavedit v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Wavedit v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &wavedit::EngineConfig) -> anyhow::Result<()> {
    match cmd {
        Commands::Info { input } => commands::info(&input, config)
            .with_context(|| format!("reading {}", input.display())),
        Commands::Trim { args } => run_edit(EditCommand::Trim, &args, config),
        Commands::Delete { args } => run_edit(EditCommand::Delete, &args, config),
        Commands::Split { args, at } => run_edit(EditCommand::Split { at }, &args, config),
        Commands::Normalize { args } => run_edit(EditCommand::Normalize, &args, config),
        Commands::Fade { args, kind } => run_edit(EditCommand::Fade(kind.into()), &args, config),
        Commands::Export { args } => commands::export(&args, config)
            .with_context(|| format!("exporting {}", args.input.display())),
    }
}

fn run_edit(
    command: EditCommand,
    args: &wavedit::cli::EditArgs,
    config: &wavedit::EngineConfig,
) -> anyhow::Result<()> {
    commands::edit(command, args, config)
        .with_context(|| format!("editing {}", args.input.display()))
}
