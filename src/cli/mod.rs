//! CLI Module
//!
//! Command-line interface for the Oubliette maze generator.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Oubliette - procedural layered maze generator
#[derive(Parser, Debug)]
#[command(name = "oubliette")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Generation parameters shared by the generating subcommands.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Maze grid size (N x N cells)
    #[arg(short = 'n', long, default_value_t = 10)]
    pub size: usize,

    /// Generation seed; omit for a random one
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Stop once this percentage of cells has been visited
    #[arg(long, value_name = "PERCENT")]
    pub cutoff: Option<u8>,

    /// Skip deadend markers
    #[arg(long)]
    pub no_deadends: bool,

    /// Skip longest-path highlighting
    #[arg(long)]
    pub no_path: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a maze and print it
    #[command(name = "generate")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,

        /// Save the resulting settings (with the seed pinned) here
        #[arg(long)]
        save_to: Option<PathBuf>,
    },

    /// Write a settings file without generating
    #[command(name = "save-settings")]
    SaveSettings {
        /// Path for the settings file
        path: PathBuf,

        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Generate from a saved settings file
    #[command(name = "generate-saved")]
    GenerateSaved {
        /// Path to the settings file
        path: PathBuf,
    },

    /// Generate a three-layer vertical stack and walk it
    #[command(name = "layers")]
    Layers {
        #[command(flatten)]
        args: GenerateArgs,

        /// Layer transitions to perform, e.g. "up,up,down"
        #[arg(long, value_delimiter = ',')]
        moves: Vec<String>,
    },
}
