//! Oubliette CLI - Procedural Layered Maze Generator
//!
//! Command-line interface for the Oubliette maze generator.

use clap::Parser;
use env_logger::Env;
use log::info;

use oubliette::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Oubliette Maze Generator v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd)?,
        None => {
            println!("Oubliette Maze Generator v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
        }
    }
    Ok(())
}

fn handle_command(cmd: Commands) -> oubliette::Result<()> {
    match cmd {
        Commands::Generate { args, save_to } => commands::generate(&args, save_to.as_deref()),
        Commands::SaveSettings { path, args } => commands::save_settings(&path, &args),
        Commands::GenerateSaved { path } => commands::generate_saved(&path),
        Commands::Layers { args, moves } => commands::layers(&args, &moves),
    }
}
