//! Root CLI structure for q3-rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "q3-rs")]
#[command(about = "Command-line tools for Quake III player models", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// MD3 model operations
    Md3 {
        #[command(subcommand)]
        command: crate::commands::md3::Md3Commands,
    },

    /// Display a parsed animation.cfg
    Anim {
        /// Path to the animation.cfg file
        file: PathBuf,
    },

    /// Display a parsed .skin file
    Skin {
        /// Path to the .skin file
        file: PathBuf,
    },

    /// Load a player model directory and simulate playback
    Player(crate::commands::player::PlayerArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
