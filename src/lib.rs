#![forbid(unsafe_code)]

//! argo-rules: a flat, multi-fire rule evaluator
//!
//! A [`RuleSet`] holds [`Rule`]s in insertion order. Evaluating it against a
//! [`Context`] runs every rule whose condition holds, letting each action see
//! the mutations of the ones before it. The crate ships one example rule that
//! rolls a pool of d10 dice and counts successes; further rules can be
//! declared as data in argo.toml.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod rules;

// Re-export error types for convenient access
pub use error::{ArgoError, ConfigError, RuleError, RulePart};

// Re-export core domain types for convenient access
pub use context::Context;
pub use rules::{
    Action, Condition, EvaluationResult, Expr, Rule, RuleDefinition, RuleSet, RuleSummary,
};
