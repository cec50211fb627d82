//! Eval command implementation
//!
//! This module implements `argo-rules eval`, which:
//! - Loads the seed context and output settings from argo.toml
//! - Applies `--set key=value` overrides on top of the file's context
//! - Evaluates the dice rule and the file's `[[rules]]` once against the
//!   resulting context
//! - Prints the rules that fired and the final context

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{
    EXIT_ERROR, EXIT_PARSE_ERROR, EXIT_SUCCESS, build_rule_set, load_config, resolve_output,
};
use crate::config::parse_override;
use crate::context::Context;
use crate::error::{ArgoError, ConfigError};
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::rules::{EvaluationResult, RuleDefinition};
use std::path::Path;

/// Options for a single eval run
#[derive(Debug, Clone)]
pub struct EvalOptions<'a> {
    pub config_path: &'a Path,
    pub overrides: &'a [String],
    pub seed: Option<u64>,
    pub format: Option<OutputFormat>,
    pub color: Option<ColorChoice>,
}

/// Run the eval command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error (I/O, validation, or a rule failure)
/// - 3: Parse error (invalid TOML configuration)
pub fn run_eval(options: &EvalOptions<'_>) -> i32 {
    match run_eval_inner(options) {
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

fn run_eval_inner(options: &EvalOptions<'_>) -> Result<(), ArgoError> {
    let config = load_config(options.config_path)?;
    let (format, color) = resolve_output(options.format, options.color, &config.output);

    let mut ctx = config.context;
    apply_overrides(&mut ctx, options.overrides)?;

    let result = evaluate(&mut ctx, options.seed, &config.rules)?;

    match format {
        OutputFormat::Human => {
            let formatter = HumanFormatter::new();
            formatter.write_to_stdout(color, |f, w| f.render_evaluation(w, &result, &ctx))?;
        }
        OutputFormat::Jsonl => {
            let formatter = JsonlFormatter::new();
            formatter.write_to_stdout(&formatter.format_evaluation(&result, &ctx));
        }
    }

    Ok(())
}

/// Apply `key=value` overrides in order; later ones win
pub(crate) fn apply_overrides(ctx: &mut Context, overrides: &[String]) -> Result<(), ConfigError> {
    for raw in overrides {
        let (key, value) = parse_override(raw)?;
        tracing::debug!(key = %key, value = %value, "Context override");
        ctx.insert(key, value);
    }
    Ok(())
}

fn evaluate(
    ctx: &mut Context,
    seed: Option<u64>,
    definitions: &[RuleDefinition],
) -> Result<EvaluationResult, ArgoError> {
    let result = build_rule_set(seed, definitions).evaluate(ctx)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    #[test]
    fn test_apply_overrides_in_order() {
        let mut ctx = Context::new().with("dice_pool", 5);
        let overrides = vec![
            "dice_pool=2".to_string(),
            "difficulty=9".to_string(),
            "dice_pool=3".to_string(),
        ];

        apply_overrides(&mut ctx, &overrides).unwrap();

        assert_eq!(ctx.get("dice_pool"), Some(&json!(3)));
        assert_eq!(ctx.get("difficulty"), Some(&json!(9)));
    }

    #[test]
    fn test_apply_overrides_stops_on_malformed() {
        let mut ctx = Context::new();
        let overrides = vec!["a=1".to_string(), "broken".to_string(), "b=2".to_string()];

        assert!(matches!(
            apply_overrides(&mut ctx, &overrides),
            Err(ConfigError::InvalidOverride(_))
        ));
        assert!(ctx.contains_key("a"));
        assert!(!ctx.contains_key("b"));
    }

    #[test]
    fn test_evaluate_fires_dice_rule() {
        let mut ctx = Context::new().with("dice_pool", 4).with("difficulty", 8);
        let result = evaluate(&mut ctx, Some(3), &[]).unwrap();
        assert_eq!(result.fired, vec!["D10Roll"]);
        assert_eq!(ctx.get("rolls").and_then(|v| v.as_array()).map(Vec::len), Some(4));
    }

    #[test]
    fn test_evaluate_without_dice_keys_fires_nothing() {
        let mut ctx = Context::new().with("user_role", "admin");
        let result = evaluate(&mut ctx, None, &[]).unwrap();
        assert!(result.fired.is_empty());
        assert_eq!(ctx, Context::new().with("user_role", "admin"));
    }

    #[test]
    fn test_declared_rules_see_dice_outcome() {
        let config = Config::parse(
            r#"
[argo]
version = "1"

[context]
dice_pool = 3
difficulty = 1

[[rules]]
name = "Triumph"
when = { op = "gte", left = { op = "field", key = "successes" }, right = { op = "literal", value = 3 } }
effects = [{ type = "set", target = "outcome", value = { op = "literal", value = "triumph" } }]

[[rules]]
name = "Botch"
when = { op = "eq", left = { op = "field", key = "successes" }, right = { op = "literal", value = 0 } }
effects = [{ type = "set", target = "outcome", value = { op = "literal", value = "botch" } }]
"#,
        )
        .unwrap();

        let mut ctx = config.context;
        let result = evaluate(&mut ctx, Some(9), &config.rules).unwrap();

        assert_eq!(result.rules_checked, 3);
        assert_eq!(result.fired, vec!["D10Roll", "Triumph"]);
        assert_eq!(ctx.get("outcome"), Some(&json!("triumph")));
    }
}
