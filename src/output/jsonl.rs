#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Every record is one JSON object on its own line with a `type` field:
//! - `rule`: one per registered rule, in evaluation order
//! - `roll`: the outcome of a dice-pool roll
//! - `evaluation`: rules checked, rules fired, and the final context

use crate::context::Context;
use crate::rules::{EvaluationResult, RollOutcome, RuleSummary};
use serde::Serialize;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// One `rule` record per rule
    pub fn format_rules(&self, rules: &[RuleSummary]) -> String {
        let mut output = String::new();
        for rule in rules {
            push_record(
                &mut output,
                &RuleRecord {
                    record_type: "rule",
                    name: &rule.name,
                    description: &rule.description,
                },
            );
        }
        output
    }

    /// A single `roll` record
    pub fn format_roll(&self, outcome: &RollOutcome, difficulty: i64) -> String {
        let mut output = String::new();
        push_record(
            &mut output,
            &RollRecord {
                record_type: "roll",
                difficulty,
                rolls: &outcome.rolls,
                successes: outcome.successes,
            },
        );
        output
    }

    /// A single `evaluation` record
    pub fn format_evaluation(&self, result: &EvaluationResult, ctx: &Context) -> String {
        let mut output = String::new();
        push_record(
            &mut output,
            &EvaluationRecord {
                record_type: "evaluation",
                rules_checked: result.rules_checked,
                fired: &result.fired,
                context: ctx,
            },
        );
        output
    }

    /// Write formatted output to stdout
    pub fn write_to_stdout(&self, output: &str) {
        print!("{}", output);
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_record<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

#[derive(Debug, Serialize)]
struct RuleRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct RollRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    difficulty: i64,
    rolls: &'a [i64],
    successes: usize,
}

#[derive(Debug, Serialize)]
struct EvaluationRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rules_checked: usize,
    fired: &'a [String],
    context: &'a Context,
}
