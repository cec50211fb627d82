//! Integration tests for rules declared as data
//!
//! Declared rules are ordinary rules once built, so they take part in the
//! same ordered, multi-fire pass as the dice rule and closure rules.

mod common;

use argo_rules::config::Config;
use argo_rules::rules::{SeededRandom, configured_rule_set};
use argo_rules::{Context, Expr, Rule, RuleDefinition, RuleError, RuleSet};
use common::TestResult;
use serde_json::json;

const CONFIG: &str = r#"
[argo]
version = "1"

[[rules]]
name = "Admin"
description = "Grants access if user is admin."
when = { op = "eq", left = { op = "field", key = "user_role" }, right = { op = "literal", value = "admin" } }
effects = [{ type = "set", target = "access", value = { op = "literal", value = "granted" } }]

[[rules]]
name = "Audit"
description = "Counts granted accesses."
when = { op = "in", left = { op = "field", key = "access" }, right = { op = "literal", value = "granted, elevated" } }
effects = [{ type = "add", target = "audits", value = { op = "literal", value = 1 } }]
"#;

fn declared(config: &str) -> Vec<RuleDefinition> {
    assert_ok!(Config::parse(config)).rules
}

#[test]
fn test_later_declared_rule_sees_earlier_effects() -> TestResult {
    let mut rules = RuleSet::new();
    for definition in declared(CONFIG) {
        rules.add_rule(definition.to_rule());
    }

    let mut ctx = Context::new().with("user_role", "admin");
    let result = rules.evaluate(&mut ctx)?;

    assert_eq!(result.fired, vec!["Admin", "Audit"]);
    assert_eq!(ctx.get("access"), Some(&json!("granted")));
    assert_eq!(ctx.get("audits"), Some(&json!(1)));

    // a second pass fires both again
    rules.evaluate(&mut ctx)?;
    assert_eq!(ctx.get("audits"), Some(&json!(2)));
    Ok(())
}

#[test]
fn test_declared_rules_skip_when_condition_fails() -> TestResult {
    let mut rules = RuleSet::new();
    for definition in declared(CONFIG) {
        rules.add_rule(definition.to_rule());
    }

    let mut ctx = Context::new().with("user_role", "guest");
    let result = rules.evaluate(&mut ctx)?;

    assert_eq!(result.rules_checked, 2);
    assert!(result.fired.is_empty());
    assert_eq!(ctx, Context::new().with("user_role", "guest"));
    Ok(())
}

#[test]
fn test_declared_rules_mix_with_closure_rules() -> TestResult {
    let mut rules = configured_rule_set(SeededRandom::new(4), &declared(CONFIG));
    rules.add_rule(Rule::new(
        "Elevate",
        "Elevates audited users",
        |ctx: &Context| ctx.contains_key("audits"),
        |ctx: &mut Context| -> Result<(), RuleError> {
            ctx.insert("access", "elevated");
            Ok(())
        },
    ));

    let mut ctx = Context::new()
        .with("user_role", "admin")
        .with("dice_pool", 2)
        .with("difficulty", 11);
    let result = rules.evaluate(&mut ctx)?;

    assert_eq!(result.fired, vec!["D10Roll", "Admin", "Audit", "Elevate"]);
    assert_eq!(ctx.get("successes"), Some(&json!(0)));
    assert_eq!(ctx.get("access"), Some(&json!("elevated")));
    Ok(())
}

#[test]
fn test_expression_condition_used_directly() {
    let rule = Rule::new(
        "HighDifficulty",
        "",
        Expr::Gt {
            left: Box::new(Expr::field("difficulty")),
            right: Box::new(Expr::literal(8)),
        },
        |ctx: &mut Context| -> Result<(), RuleError> {
            ctx.insert("hard", true);
            Ok(())
        },
    );

    assert!(!assert_ok!(rule.applies(&Context::new().with("difficulty", 8))));
    assert!(assert_ok!(rule.applies(&Context::new().with("difficulty", 9))));
}
