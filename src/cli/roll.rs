//! Roll command implementation
//!
//! Seeds a context with `dice_pool` and `difficulty`, runs the rule set over
//! it and reports the rolls and successes the dice rule wrote back.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{EXIT_ERROR, EXIT_SUCCESS, build_rule_set, color_choice};
use crate::context::Context;
use crate::error::{ArgoError, RuleError};
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::rules::RollOutcome;
use crate::rules::dice::{DICE_POOL_KEY, DIFFICULTY_KEY, ROLLS_KEY};

/// Run the roll command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
pub fn run_roll(
    pool: u32,
    difficulty: i64,
    seed: Option<u64>,
    format: OutputFormat,
    color: Option<ColorChoice>,
) -> i32 {
    match run_roll_inner(pool, difficulty, seed, format, color) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn run_roll_inner(
    pool: u32,
    difficulty: i64,
    seed: Option<u64>,
    format: OutputFormat,
    color: Option<ColorChoice>,
) -> Result<(), ArgoError> {
    let outcome = roll(pool, difficulty, seed)?;

    match format {
        OutputFormat::Human => {
            let formatter = HumanFormatter::new();
            formatter.write_to_stdout(color_choice(color), |f, w| {
                f.render_roll(w, &outcome, difficulty)
            })?;
        }
        OutputFormat::Jsonl => {
            let formatter = JsonlFormatter::new();
            formatter.write_to_stdout(&formatter.format_roll(&outcome, difficulty));
        }
    }

    Ok(())
}

/// Evaluate the rule set for one dice pool and read back the outcome
pub(crate) fn roll(pool: u32, difficulty: i64, seed: Option<u64>) -> Result<RollOutcome, RuleError> {
    let mut ctx = Context::new()
        .with(DICE_POOL_KEY, pool)
        .with(DIFFICULTY_KEY, difficulty);

    build_rule_set(seed, &[]).evaluate(&mut ctx)?;

    RollOutcome::from_context(&ctx).ok_or_else(|| RuleError::MissingKey(ROLLS_KEY.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MAX_DICE_POOL;

    #[test]
    fn test_roll_returns_pool_sized_outcome() {
        let outcome = roll(5, 7, None).unwrap();
        assert_eq!(outcome.rolls.len(), 5);
        assert!(outcome.rolls.iter().all(|r| (1..=10).contains(r)));
        assert_eq!(
            outcome.successes,
            outcome.rolls.iter().filter(|&&r| r >= 7).count()
        );
    }

    #[test]
    fn test_roll_zero_pool() {
        let outcome = roll(0, 1, Some(1)).unwrap();
        assert!(outcome.rolls.is_empty());
        assert_eq!(outcome.successes, 0);
    }

    #[test]
    fn test_roll_rejects_pool_over_limit() {
        let err = roll(MAX_DICE_POOL as u32 + 1, 7, Some(1)).unwrap_err();
        assert!(matches!(err, RuleError::InvalidValue { .. }));
    }

    #[test]
    fn test_roll_with_seed_is_reproducible() {
        assert_eq!(roll(10, 6, Some(99)).unwrap(), roll(10, 6, Some(99)).unwrap());
    }
}
