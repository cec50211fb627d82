#![forbid(unsafe_code)]

//! Rules, rule sets, the shipped dice rule, and rules declared in argo.toml

pub mod declarative;
pub mod dice;
pub mod expression;
mod rule;
mod rule_set;

// Re-export core types
pub use declarative::{Effect, EffectKind, RuleDefinition};
pub use dice::{
    MAX_DICE_POOL, RandomSource, RollOutcome, SeededRandom, ThreadRandom, dice_rule,
    dice_rule_with,
};
pub use expression::Expr;
pub use rule::{Action, Condition, Rule, RuleBuilder, RuleSummary};
pub use rule_set::{EvaluationResult, RuleSet};

/// The built-in rule set: the dice rule alone
pub fn default_rule_set(source: impl RandomSource + 'static) -> RuleSet {
    let mut rules = RuleSet::new();
    rules.add_rule(dice_rule_with(source));
    rules
}

/// The built-in rules followed by `definitions`, in the order given
pub fn configured_rule_set(
    source: impl RandomSource + 'static,
    definitions: &[RuleDefinition],
) -> RuleSet {
    let mut rules = default_rule_set(source);
    for definition in definitions {
        rules.add_rule(definition.to_rule());
    }
    rules
}
