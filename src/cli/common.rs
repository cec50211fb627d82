//! Common helpers shared across CLI commands

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::config::{ColorOption, Config, OutputConfig};
use crate::config::argo_toml::OutputFormat as ConfigFormat;
use crate::error::ConfigError;
use crate::rules::{RuleDefinition, RuleSet, SeededRandom, ThreadRandom, configured_rule_set};
use std::path::Path;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Build the rule set the CLI evaluates
///
/// The dice rule comes first, then the declared rules in file order. A seed
/// makes the dice rolls reproducible; without one the thread RNG is used.
pub(crate) fn build_rule_set(seed: Option<u64>, definitions: &[RuleDefinition]) -> RuleSet {
    match seed {
        Some(seed) => configured_rule_set(SeededRandom::new(seed), definitions),
        None => configured_rule_set(ThreadRandom, definitions),
    }
}

/// Load argo.toml, pointing at `init` when the file is missing
pub(crate) fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "{} not found. Run 'argo-rules init' to create it.",
                path.display()
            ),
        )));
    }

    Config::load(path)
}

/// Map the CLI color flag onto termcolor
pub(crate) fn color_choice(color: Option<ColorChoice>) -> termcolor::ColorChoice {
    match color.unwrap_or(ColorChoice::Auto) {
        ColorChoice::Auto => auto_color(),
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
    }
}

/// Resolve output settings: CLI flags win over argo.toml
pub(crate) fn resolve_output(
    format: Option<OutputFormat>,
    color: Option<ColorChoice>,
    config: &OutputConfig,
) -> (OutputFormat, termcolor::ColorChoice) {
    let format = format.unwrap_or(match config.format {
        ConfigFormat::Human => OutputFormat::Human,
        ConfigFormat::Jsonl => OutputFormat::Jsonl,
    });

    let color = color.or(Some(match config.color {
        ColorOption::Auto => ColorChoice::Auto,
        ColorOption::Always => ColorChoice::Always,
        ColorOption::Never => ColorChoice::Never,
    }));

    (format, color_choice(color))
}

fn auto_color() -> termcolor::ColorChoice {
    use std::io::IsTerminal;

    if std::io::stdout().is_terminal() {
        termcolor::ColorChoice::Auto
    } else {
        termcolor::ColorChoice::Never
    }
}
