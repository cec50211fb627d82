//! CLI argument parsing using clap

use crate::rules::MAX_DICE_POOL;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for argo-rules commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// argo-rules CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "argo-rules")]
#[command(about = "Evaluate rule sets against a context, starting with d10 dice pools")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (overrides argo.toml)
    #[arg(long, global = true)]
    pub color: Option<ColorChoice>,
}

/// Available argo-rules subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a sample argo.toml in the current directory
    Init {
        /// Overwrite an existing argo.toml
        #[arg(long)]
        force: bool,
    },

    /// List the rules that are evaluated
    List {
        /// Also list the rules declared in this configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },

    /// Roll a pool of d10 dice against a difficulty
    Roll {
        /// Number of dice in the pool
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=MAX_DICE_POOL as i64))]
        pool: u32,

        /// Minimum value that counts as a success
        #[arg(short, long, allow_negative_numbers = true)]
        difficulty: i64,

        /// Seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },

    /// Evaluate the rule set against the context from argo.toml
    Eval {
        /// Configuration file to read the context from
        #[arg(short, long, default_value = "argo.toml")]
        config: PathBuf,

        /// Set or override a context value (key=value, repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (overrides argo.toml)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}
