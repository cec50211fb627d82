#![forbid(unsafe_code)]

//! Expression trees for rules declared in configuration
//!
//! An [`Expr`] is evaluated against a [`Context`] and always yields a value;
//! it never fails. Missing fields read as `null`, non-numeric operands of
//! arithmetic read as `0`, and division by zero skips the divisor. Trees
//! nested deeper than [`MAX_EXPRESSION_DEPTH`] evaluate to `null` below the
//! limit.
//!
//! In TOML an expression is an inline table tagged by `op`:
//!
//! ```toml
//! when = { op = "gte", left = { op = "field", key = "successes" }, right = { op = "literal", value = 3 } }
//! ```

use crate::context::Context;
use crate::error::RuleError;
use crate::rules::rule::Condition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deepest expression nesting that is evaluated
pub const MAX_EXPRESSION_DEPTH: usize = 40;

/// A node of an expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Expr {
    /// A constant; an omitted value is `null`
    Literal {
        #[serde(default, skip_serializing_if = "Value::is_null")]
        value: Value,
    },
    /// The context value under `key`, or `null`
    Field { key: String },

    And { args: Vec<Expr> },
    Or { args: Vec<Expr> },
    Not { arg: Box<Expr> },

    Eq { left: Box<Expr>, right: Box<Expr> },
    Neq { left: Box<Expr>, right: Box<Expr> },
    Gt { left: Box<Expr>, right: Box<Expr> },
    Gte { left: Box<Expr>, right: Box<Expr> },
    Lt { left: Box<Expr>, right: Box<Expr> },
    Lte { left: Box<Expr>, right: Box<Expr> },
    /// Membership in an array, or in a comma-separated string
    In { left: Box<Expr>, right: Box<Expr> },

    Add { args: Vec<Expr> },
    /// First argument minus the rest
    Sub { args: Vec<Expr> },
    Mul { args: Vec<Expr> },
    /// First argument divided by the rest, skipping zero divisors
    Div { args: Vec<Expr> },
    Min { args: Vec<Expr> },
    Max { args: Vec<Expr> },

    /// Rounds half up
    Round { arg: Box<Expr> },
    Floor { arg: Box<Expr> },
    Ceil { arg: Box<Expr> },
    Clamp {
        value: Box<Expr>,
        min: Box<Expr>,
        max: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal {
            value: value.into(),
        }
    }

    pub fn field(key: impl Into<String>) -> Self {
        Expr::Field { key: key.into() }
    }

    /// Evaluates the expression against a context
    pub fn evaluate(&self, ctx: &Context) -> Value {
        self.evaluate_at(ctx, 0)
    }

    /// Evaluates the expression and reads the result as a condition
    pub fn is_satisfied(&self, ctx: &Context) -> bool {
        is_truthy(&self.evaluate(ctx))
    }

    /// Number of nodes on the longest path from this node to a leaf
    pub fn depth(&self) -> usize {
        let below = match self {
            Expr::Literal { .. } | Expr::Field { .. } => 0,
            Expr::Not { arg } | Expr::Round { arg } | Expr::Floor { arg } | Expr::Ceil { arg } => {
                arg.depth()
            }
            Expr::And { args }
            | Expr::Or { args }
            | Expr::Add { args }
            | Expr::Sub { args }
            | Expr::Mul { args }
            | Expr::Div { args }
            | Expr::Min { args }
            | Expr::Max { args } => args.iter().map(Expr::depth).max().unwrap_or(0),
            Expr::Eq { left, right }
            | Expr::Neq { left, right }
            | Expr::Gt { left, right }
            | Expr::Gte { left, right }
            | Expr::Lt { left, right }
            | Expr::Lte { left, right }
            | Expr::In { left, right } => left.depth().max(right.depth()),
            Expr::Clamp { value, min, max } => value.depth().max(min.depth()).max(max.depth()),
        };
        below + 1
    }

    fn evaluate_at(&self, ctx: &Context, depth: usize) -> Value {
        if depth >= MAX_EXPRESSION_DEPTH {
            return Value::Null;
        }
        let next = depth + 1;
        let eval = |expr: &Expr| expr.evaluate_at(ctx, next);
        let num = |expr: &Expr| to_number(&expr.evaluate_at(ctx, next));
        let nums = |args: &[Expr]| args.iter().map(num).collect::<Vec<f64>>();

        match self {
            Expr::Literal { value } => value.clone(),
            Expr::Field { key } => ctx.get(key).cloned().unwrap_or(Value::Null),

            Expr::And { args } => Value::Bool(args.iter().all(|a| is_truthy(&eval(a)))),
            Expr::Or { args } => Value::Bool(args.iter().any(|a| is_truthy(&eval(a)))),
            Expr::Not { arg } => Value::Bool(!is_truthy(&eval(arg))),

            Expr::Eq { left, right } => Value::Bool(loosely_equal(&eval(left), &eval(right))),
            Expr::Neq { left, right } => Value::Bool(!loosely_equal(&eval(left), &eval(right))),
            Expr::Gt { left, right } => Value::Bool(num(left) > num(right)),
            Expr::Gte { left, right } => Value::Bool(num(left) >= num(right)),
            Expr::Lt { left, right } => Value::Bool(num(left) < num(right)),
            Expr::Lte { left, right } => Value::Bool(num(left) <= num(right)),
            Expr::In { left, right } => Value::Bool(contains(&eval(right), &eval(left))),

            Expr::Add { args } => number(nums(args).into_iter().sum()),
            Expr::Sub { args } => fold_first(&nums(args), |acc, n| acc - n),
            Expr::Mul { args } => fold_first(&nums(args), |acc, n| acc * n),
            Expr::Div { args } => {
                fold_first(&nums(args), |acc, n| if n == 0.0 { acc } else { acc / n })
            }
            Expr::Min { args } => fold_first(&nums(args), f64::min),
            Expr::Max { args } => fold_first(&nums(args), f64::max),

            Expr::Round { arg } => number((num(arg) + 0.5).floor()),
            Expr::Floor { arg } => number(num(arg).floor()),
            Expr::Ceil { arg } => number(num(arg).ceil()),
            Expr::Clamp { value, min, max } => number(num(value).max(num(min)).min(num(max))),
        }
    }
}

impl Condition for Expr {
    fn check(&self, ctx: &Context) -> Result<bool, RuleError> {
        Ok(self.is_satisfied(ctx))
    }
}

/// Reads a value as a number; anything non-numeric is `0`
///
/// Booleans are `1`/`0` and strings are parsed after trimming.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Reads a value as a condition result
///
/// `null`, `false`, `0`, blank strings and empty arrays are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Converts an arithmetic result back into a JSON value
///
/// Whole numbers stay integers; non-finite results become `null`.
pub(crate) fn number(n: f64) -> Value {
    // 2^53: the largest range where every whole f64 is exact
    const EXACT: f64 = 9_007_199_254_740_992.0;

    if n.fract() == 0.0 && n.abs() < EXACT {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn fold_first(values: &[f64], f: impl Fn(f64, f64) -> f64) -> Value {
    match values.split_first() {
        Some((first, rest)) => number(rest.iter().copied().fold(*first, f)),
        None => Value::from(0),
    }
}

/// Strict equality, except that `3` and `3.0` are equal
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|item| loosely_equal(item, needle)),
        Value::String(list) => {
            let needle = match needle {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            list.split(',').any(|token| token.trim() == needle)
        }
        _ => false,
    }
}
