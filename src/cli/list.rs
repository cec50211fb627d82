//! List command implementation
//!
//! Prints the name and description of every rule the CLI evaluates, in
//! evaluation order. With `--config`, the rules declared in that file are
//! listed after the built-in ones.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{
    EXIT_ERROR, EXIT_PARSE_ERROR, EXIT_SUCCESS, build_rule_set, color_choice, load_config,
};
use crate::error::{ArgoError, ConfigError};
use crate::output::{HumanFormatter, JsonlFormatter};
use std::path::Path;

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error reading the configuration or writing output
/// - 3: Parse error (invalid TOML configuration)
pub fn run_list(config: Option<&Path>, format: OutputFormat, color: Option<ColorChoice>) -> i32 {
    match run_list_inner(config, format, color) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                ArgoError::Config(ConfigError::Parse(_)) => EXIT_PARSE_ERROR,
                _ => EXIT_ERROR,
            }
        }
    }
}

fn run_list_inner(
    config: Option<&Path>,
    format: OutputFormat,
    color: Option<ColorChoice>,
) -> Result<(), ArgoError> {
    let definitions = match config {
        Some(path) => load_config(path)?.rules,
        None => Vec::new(),
    };
    let summaries = build_rule_set(None, &definitions).get_rules();

    match format {
        OutputFormat::Human => {
            let formatter = HumanFormatter::new();
            formatter.write_to_stdout(color_choice(color), |f, w| {
                f.render_rules(w, &summaries)
            })?;
        }
        OutputFormat::Jsonl => {
            let formatter = JsonlFormatter::new();
            formatter.write_to_stdout(&formatter.format_rules(&summaries));
        }
    }

    Ok(())
}
