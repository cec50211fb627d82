//! argo-rules CLI entry point

use argo_rules::cli::eval::EvalOptions;
use argo_rules::cli::{Command, args::Cli};
use clap::Parser;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Init { force } => match argo_rules::cli::init::run_init(Path::new("."), force) {
            Ok(result) => {
                if result.skipped.is_empty() {
                    println!("Wrote argo.toml.");
                } else {
                    println!("argo.toml already exists. Use --force to overwrite it.");
                }
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                2
            }
        },
        Command::List { config, format } => {
            argo_rules::cli::list::run_list(config.as_deref(), format, cli.color)
        }
        Command::Roll {
            pool,
            difficulty,
            seed,
            format,
        } => argo_rules::cli::roll::run_roll(pool, difficulty, seed, format, cli.color),
        Command::Eval {
            config,
            overrides,
            seed,
            format,
        } => argo_rules::cli::eval::run_eval(&EvalOptions {
            config_path: &config,
            overrides: &overrides,
            seed,
            format,
            color: cli.color,
        }),
    };

    process::exit(exit_code);
}

/// Logs go to stderr, filtered by ARGO_LOG (default: warn)
fn init_logging() {
    let filter = EnvFilter::try_from_env("ARGO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
