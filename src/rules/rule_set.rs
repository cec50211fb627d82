#![forbid(unsafe_code)]

//! Ordered rule collection with a multi-fire evaluation pass
//!
//! Rules are evaluated in insertion order. Every rule whose condition holds
//! fires in the same pass, and each action sees the context as left by the
//! actions before it. The first failure aborts the pass.

use crate::context::Context;
use crate::error::RuleError;
use crate::rules::rule::{Rule, RuleSummary};

/// Outcome of a successful evaluation pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationResult {
    /// Number of rules whose condition was checked
    pub rules_checked: usize,
    /// Names of the rules that fired, in firing order
    pub fired: Vec<String>,
}

/// Append-only, ordered collection of rules
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule; duplicate names are allowed and all of them fire
    pub fn add_rule(&mut self, rule: Rule) {
        tracing::debug!(rule = rule.name(), position = self.rules.len(), "Rule added");
        self.rules.push(rule);
    }

    /// Evaluates every rule against the context, in insertion order
    ///
    /// Each condition is checked exactly once. Actions of applicable rules run
    /// immediately, so later conditions observe earlier mutations.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a condition or action unchanged. The
    /// remaining rules are skipped; mutations already made stay in the context.
    pub fn evaluate(&self, ctx: &mut Context) -> Result<EvaluationResult, RuleError> {
        let mut result = EvaluationResult::default();

        for rule in &self.rules {
            result.rules_checked += 1;

            let applies = rule
                .applies(ctx)
                .inspect_err(|e| abort_warning(rule, e))?;
            tracing::debug!(rule = rule.name(), applies, "Rule checked");
            if !applies {
                continue;
            }

            rule.execute(ctx).inspect_err(|e| abort_warning(rule, e))?;
            tracing::debug!(rule = rule.name(), "Rule fired");
            result.fired.push(rule.name().to_string());
        }

        Ok(result)
    }

    /// Name and description of every rule, in insertion order
    pub fn get_rules(&self) -> Vec<RuleSummary> {
        self.rules.iter().map(Rule::summary).collect()
    }

    /// Iterates over the rules in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn abort_warning(rule: &Rule, err: &RuleError) {
    tracing::warn!(rule = rule.name(), error = %err, "Evaluation aborted");
}
