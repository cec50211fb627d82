#![forbid(unsafe_code)]

//! Core Rule type and the condition/action traits it is built from

use crate::context::Context;
use crate::error::{RuleError, RulePart};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate half of a rule
///
/// Any `Fn(&Context) -> bool` is a `Condition`. Predicates that can fail
/// implement the trait directly.
pub trait Condition: Send + Sync {
    /// Returns whether the rule applies to the context
    fn check(&self, ctx: &Context) -> Result<bool, RuleError>;
}

impl<F> Condition for F
where
    F: Fn(&Context) -> bool + Send + Sync,
{
    fn check(&self, ctx: &Context) -> Result<bool, RuleError> {
        Ok(self(ctx))
    }
}

/// Effect half of a rule
///
/// Actions mutate the context in place; any `Fn(&mut Context) -> Result<(), RuleError>`
/// is an `Action`.
pub trait Action: Send + Sync {
    fn apply(&self, ctx: &mut Context) -> Result<(), RuleError>;
}

impl<F> Action for F
where
    F: Fn(&mut Context) -> Result<(), RuleError> + Send + Sync,
{
    fn apply(&self, ctx: &mut Context) -> Result<(), RuleError> {
        self(ctx)
    }
}

/// Name and description of a rule, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub name: String,
    pub description: String,
}

/// A named pairing of a condition and an action
///
/// Rules are immutable once built. Names are not validated and need not be
/// unique.
pub struct Rule {
    name: String,
    description: String,
    condition: Option<Box<dyn Condition>>,
    action: Option<Box<dyn Action>>,
}

impl Rule {
    /// Creates a rule from a condition and an action
    ///
    /// No argument is validated.
    ///
    /// # Examples
    ///
    /// ```
    /// use argo_rules::{Context, Rule, RuleError};
    ///
    /// let rule = Rule::new(
    ///     "AdminAccess",
    ///     "Grants access if user is admin.",
    ///     |ctx: &Context| ctx.get("user_role").and_then(|v| v.as_str()) == Some("admin"),
    ///     |ctx: &mut Context| -> Result<(), RuleError> {
    ///         ctx.insert("access", "granted");
    ///         Ok(())
    ///     },
    /// );
    ///
    /// let mut ctx = Context::new().with("user_role", "admin");
    /// assert!(rule.applies(&ctx).unwrap());
    /// rule.execute(&mut ctx).unwrap();
    /// assert_eq!(ctx.get("access").and_then(|v| v.as_str()), Some("granted"));
    /// ```
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        condition: impl Condition + 'static,
        action: impl Action + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            condition: Some(Box::new(condition)),
            action: Some(Box::new(action)),
        }
    }

    /// Starts a rule whose condition and action are supplied separately
    ///
    /// A half that is never supplied makes the corresponding invocation fail
    /// with `RuleError::NotCallable`.
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            name: name.into(),
            description: description.into(),
            condition: None,
            action: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Runs the condition against the context and returns its answer unchanged
    pub fn applies(&self, ctx: &Context) -> Result<bool, RuleError> {
        match &self.condition {
            Some(condition) => condition.check(ctx),
            None => Err(self.not_callable(RulePart::Condition)),
        }
    }

    /// Runs the action against the context
    pub fn execute(&self, ctx: &mut Context) -> Result<(), RuleError> {
        match &self.action {
            Some(action) => action.apply(ctx),
            None => Err(self.not_callable(RulePart::Action)),
        }
    }

    fn not_callable(&self, part: RulePart) -> RuleError {
        RuleError::NotCallable {
            rule: self.name.clone(),
            part,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_condition", &self.condition.is_some())
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// Builder returned by [`Rule::builder`]
pub struct RuleBuilder {
    name: String,
    description: String,
    condition: Option<Box<dyn Condition>>,
    action: Option<Box<dyn Action>>,
}

impl RuleBuilder {
    pub fn condition(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn action(mut self, action: impl Action + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Finishes the rule; never fails
    pub fn build(self) -> Rule {
        Rule {
            name: self.name,
            description: self.description,
            condition: self.condition,
            action: self.action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn always_true(_: &Context) -> bool {
        true
    }

    fn set_flag(ctx: &mut Context) -> Result<(), RuleError> {
        ctx.insert("flag", true);
        Ok(())
    }

    #[test]
    fn test_rule_accessors() {
        let rule = Rule::new("Flag", "Sets a flag", always_true, set_flag);
        assert_eq!(rule.name(), "Flag");
        assert_eq!(rule.description(), "Sets a flag");
        assert_eq!(
            rule.summary(),
            RuleSummary {
                name: "Flag".to_string(),
                description: "Sets a flag".to_string(),
            }
        );
    }

    #[test]
    fn test_applies_returns_condition_result() {
        let rule = Rule::new(
            "HasKey",
            "",
            |ctx: &Context| ctx.contains_key("x"),
            set_flag,
        );
        assert!(!rule.applies(&Context::new()).unwrap());
        assert!(rule.applies(&Context::new().with("x", 1)).unwrap());
    }

    #[test]
    fn test_applies_is_idempotent_for_pure_conditions() {
        let rule = Rule::new("HasKey", "", |ctx: &Context| ctx.contains_key("x"), set_flag);
        let ctx = Context::new().with("x", 1);
        assert_eq!(rule.applies(&ctx).unwrap(), rule.applies(&ctx).unwrap());
    }

    #[test]
    fn test_execute_runs_action() {
        let rule = Rule::new("Flag", "", always_true, set_flag);
        let mut ctx = Context::new();
        rule.execute(&mut ctx).unwrap();
        assert_eq!(ctx.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn test_execute_does_not_check_condition() {
        let rule = Rule::new("Never", "", |_: &Context| false, set_flag);
        let mut ctx = Context::new();
        rule.execute(&mut ctx).unwrap();
        assert!(ctx.contains_key("flag"));
    }

    #[test]
    fn test_missing_condition_is_not_callable() {
        let rule = Rule::builder("NoCondition", "").action(set_flag).build();
        match rule.applies(&Context::new()) {
            Err(RuleError::NotCallable { rule, part }) => {
                assert_eq!(rule, "NoCondition");
                assert_eq!(part, RulePart::Condition);
            }
            other => panic!("Expected NotCallable, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_action_is_not_callable() {
        let rule = Rule::builder("NoAction", "").condition(always_true).build();
        assert!(rule.applies(&Context::new()).unwrap());
        let mut ctx = Context::new();
        assert!(matches!(
            rule.execute(&mut ctx),
            Err(RuleError::NotCallable {
                part: RulePart::Action,
                ..
            })
        ));
        assert!(ctx.is_empty());
    }

    struct FailingCondition;

    impl Condition for FailingCondition {
        fn check(&self, _ctx: &Context) -> Result<bool, RuleError> {
            Err(RuleError::InvalidValue {
                key: "x".to_string(),
                message: "unreadable".to_string(),
            })
        }
    }

    #[test]
    fn test_fallible_condition_propagates() {
        let rule = Rule::new("Failing", "", FailingCondition, set_flag);
        assert!(matches!(
            rule.applies(&Context::new()),
            Err(RuleError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_debug_hides_callables() {
        let rule = Rule::builder("Partial", "desc").condition(always_true).build();
        let debug = format!("{:?}", rule);
        assert!(debug.contains("Partial"));
        assert!(debug.contains("has_condition: true"));
        assert!(debug.contains("has_action: false"));
    }

    #[test]
    fn test_rule_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Rule>();
        assert_sync::<Rule>();
    }
}
