#![forbid(unsafe_code)]

//! Rules declared as data
//!
//! A [`RuleDefinition`] is read from a `[[rules]]` entry in argo.toml and
//! turned into an ordinary [`Rule`]: its `when` expression becomes the
//! condition and its effects become the action.
//!
//! ```toml
//! [[rules]]
//! name = "Triumph"
//! description = "Marks rolls with three or more successes."
//! when = { op = "gte", left = { op = "field", key = "successes" }, right = { op = "literal", value = 3 } }
//! effects = [
//!     { type = "set", target = "outcome", value = { op = "literal", value = "triumph" } },
//! ]
//! ```

use crate::context::Context;
use crate::error::RuleError;
use crate::rules::expression::{Expr, MAX_EXPRESSION_DEPTH, number, to_number};
use crate::rules::rule::{Action, Rule};
use serde::{Deserialize, Serialize};

/// How an effect combines its value with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Replace the target with the value
    #[default]
    Set,
    /// Add the value to the target, read as a number
    Add,
    /// Multiply the target, read as a number, by the value
    Multiply,
}

/// One context update performed when a declared rule fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(rename = "type", default)]
    pub kind: EffectKind,
    /// Context key to update
    pub target: String,
    pub value: Expr,
}

impl Effect {
    /// Evaluates the value against `ctx` and writes the result to the target
    ///
    /// A missing or non-numeric target counts as `0` for `add` and `multiply`.
    pub fn apply(&self, ctx: &mut Context) {
        let value = self.value.evaluate(ctx);
        let current = || ctx.get(&self.target).map_or(0.0, to_number);

        let updated = match self.kind {
            EffectKind::Set => value,
            EffectKind::Add => number(current() + to_number(&value)),
            EffectKind::Multiply => number(current() * to_number(&value)),
        };

        tracing::debug!(target_key = %self.target, kind = ?self.kind, value = %updated, "Effect applied");
        ctx.insert(self.target.clone(), updated);
    }
}

/// A rule as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Condition; the rule fires when this evaluates to a truthy value
    pub when: Expr,

    /// Applied in order, each one seeing the updates of the ones before it
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl RuleDefinition {
    /// Checks the definition can be turned into a rule
    ///
    /// # Errors
    ///
    /// Returns a message naming the rule if:
    /// - The name is empty
    /// - An effect has an empty target
    /// - An expression is nested deeper than [`MAX_EXPRESSION_DEPTH`]
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Rule names must not be empty".to_string());
        }

        let too_deep = |expr: &Expr| expr.depth() > MAX_EXPRESSION_DEPTH;

        if too_deep(&self.when) {
            return Err(format!(
                "Rule '{}': condition is nested deeper than {} levels",
                self.name, MAX_EXPRESSION_DEPTH
            ));
        }

        for (i, effect) in self.effects.iter().enumerate() {
            if effect.target.trim().is_empty() {
                return Err(format!(
                    "Rule '{}': effect {} has an empty target",
                    self.name,
                    i + 1
                ));
            }
            if too_deep(&effect.value) {
                return Err(format!(
                    "Rule '{}': value of effect {} is nested deeper than {} levels",
                    self.name,
                    i + 1,
                    MAX_EXPRESSION_DEPTH
                ));
            }
        }

        Ok(())
    }

    /// Builds the rule this definition describes
    pub fn to_rule(&self) -> Rule {
        Rule::new(
            self.name.clone(),
            self.description.clone(),
            self.when.clone(),
            EffectList(self.effects.clone()),
        )
    }
}

/// Action half of a declared rule
struct EffectList(Vec<Effect>);

impl Action for EffectList {
    fn apply(&self, ctx: &mut Context) -> Result<(), RuleError> {
        for effect in &self.0 {
            effect.apply(ctx);
        }
        Ok(())
    }
}
