#![forbid(unsafe_code)]

//! D10 dice-pool rule
//!
//! The rule fires when a context carries both `dice_pool` and `difficulty`.
//! Its action rolls `dice_pool` ten-sided dice, counts the dice that meet or
//! beat `difficulty`, and writes `rolls` and `successes` back into the context.
//! Pools above [`MAX_DICE_POOL`] are rejected.
//!
//! Randomness comes from a [`RandomSource`] injected at construction, so tests
//! and reproducible CLI runs can substitute their own source.

use crate::context::Context;
use crate::error::RuleError;
use crate::rules::rule::{Action, Rule};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Mutex;

/// Name of the shipped dice rule
pub const DICE_RULE_NAME: &str = "D10Roll";

/// Description of the shipped dice rule
pub const DICE_RULE_DESCRIPTION: &str = "Rolls a pool of d10 dice and counts successes.";

/// Context key holding the number of dice to roll
pub const DICE_POOL_KEY: &str = "dice_pool";

/// Context key holding the success threshold
pub const DIFFICULTY_KEY: &str = "difficulty";

/// Context key the sampled values are written to
pub const ROLLS_KEY: &str = "rolls";

/// Context key the success count is written to
pub const SUCCESSES_KEY: &str = "successes";

/// Faces on each die
pub const DIE_FACES: i64 = 10;

/// Largest pool the dice action will roll
pub const MAX_DICE_POOL: usize = 10_000;

/// Source of uniformly distributed integers
pub trait RandomSource: Send + Sync {
    /// Returns an integer in `low..=high`
    fn roll(&self, low: i64, high: i64) -> i64;
}

/// Unseeded source backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn roll(&self, low: i64, high: i64) -> i64 {
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Deterministic source seeded from a `u64`
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn roll(&self, low: i64, high: i64) -> i64 {
        // A poisoned lock still holds a usable RNG state
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(low..=high)
    }
}

/// Result of rolling a dice pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    /// Sampled values in rolling order
    pub rolls: Vec<i64>,
    /// Number of rolls at or above the difficulty
    pub successes: usize,
}

impl RollOutcome {
    /// Reads the `rolls` and `successes` a dice action left in a context
    ///
    /// Returns `None` if either key is absent or not of the expected shape.
    pub fn from_context(ctx: &Context) -> Option<Self> {
        let rolls = ctx
            .get(ROLLS_KEY)?
            .as_array()?
            .iter()
            .map(|v| v.as_i64())
            .collect::<Option<Vec<i64>>>()?;
        let successes = usize::try_from(ctx.get(SUCCESSES_KEY)?.as_u64()?).ok()?;
        Some(Self { rolls, successes })
    }
}

/// Rolls `pool` dice and counts those `>= difficulty`
///
/// `pool` is not bounded here; the dice action refuses pools above
/// [`MAX_DICE_POOL`] before calling this.
pub fn roll_pool(source: &dyn RandomSource, pool: usize, difficulty: i64) -> RollOutcome {
    let rolls: Vec<i64> = (0..pool).map(|_| source.roll(1, DIE_FACES)).collect();
    let successes = rolls.iter().filter(|&&roll| roll >= difficulty).count();
    RollOutcome { rolls, successes }
}

/// Returns true when the context carries both dice keys
///
/// Only presence is checked; types are validated by the action.
pub fn can_roll(ctx: &Context) -> bool {
    ctx.contains_key(DICE_POOL_KEY) && ctx.contains_key(DIFFICULTY_KEY)
}

/// Action half of the dice rule
pub struct DiceRollAction {
    source: Box<dyn RandomSource>,
}

impl DiceRollAction {
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }
}

impl Action for DiceRollAction {
    fn apply(&self, ctx: &mut Context) -> Result<(), RuleError> {
        let pool = ctx.require_i64(DICE_POOL_KEY)?;
        let difficulty = ctx.require_i64(DIFFICULTY_KEY)?;

        let pool = usize::try_from(pool).map_err(|_| RuleError::InvalidValue {
            key: DICE_POOL_KEY.to_string(),
            message: format!("dice pool must not be negative, got {}", pool),
        })?;
        if pool > MAX_DICE_POOL {
            return Err(RuleError::InvalidValue {
                key: DICE_POOL_KEY.to_string(),
                message: format!("dice pool must be at most {}, got {}", MAX_DICE_POOL, pool),
            });
        }

        let outcome = roll_pool(self.source.as_ref(), pool, difficulty);
        tracing::info!(
            rolls = ?outcome.rolls,
            difficulty,
            successes = outcome.successes,
            "Rolled {} d10, {} at or above {}",
            pool,
            outcome.successes,
            difficulty
        );

        ctx.insert(ROLLS_KEY, outcome.rolls);
        ctx.insert(SUCCESSES_KEY, outcome.successes);
        Ok(())
    }
}

/// The dice rule backed by the thread RNG
pub fn dice_rule() -> Rule {
    dice_rule_with(ThreadRandom)
}

/// The dice rule backed by the given random source
pub fn dice_rule_with(source: impl RandomSource + 'static) -> Rule {
    Rule::new(
        DICE_RULE_NAME,
        DICE_RULE_DESCRIPTION,
        can_roll,
        DiceRollAction::new(source),
    )
}
