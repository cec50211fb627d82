//! Test utilities for argo-rules integration tests

#![allow(dead_code)]

use argo_rules::{Context, Rule, RuleError};
use std::sync::{Arc, Mutex};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// Shared log of `condition:<name>` / `action:<name>` events
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A rule that records every condition check and action run in `log`
pub fn recording_rule(name: &str, applies: bool, log: &CallLog) -> Rule {
    let condition_log = log.clone();
    let action_log = log.clone();
    let condition_name = format!("condition:{}", name);
    let action_name = format!("action:{}", name);

    Rule::new(
        name,
        format!("Records calls for {}", name),
        move |_: &Context| {
            condition_log.lock().unwrap().push(condition_name.clone());
            applies
        },
        move |_: &mut Context| -> Result<(), RuleError> {
            action_log.lock().unwrap().push(action_name.clone());
            Ok(())
        },
    )
}
