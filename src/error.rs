//! Error types for argo-rules
//!
//! Rule evaluation failures and configuration failures are kept apart, with
//! `ArgoError` as the top-level type the CLI reports.

/// Which half of a rule was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePart {
    Condition,
    Action,
}

impl std::fmt::Display for RulePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulePart::Condition => write!(f, "condition"),
            RulePart::Action => write!(f, "action"),
        }
    }
}

/// Errors raised while checking or executing rules
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule was built without the callable being invoked
    #[error("Rule '{rule}' has no {part}: not callable")]
    NotCallable { rule: String, part: RulePart },

    /// A context key the rule relies on is absent
    #[error("Missing context key: {0}")]
    MissingKey(String),

    /// A context value has the wrong type or is out of range
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Free-form failure raised by a caller-written action
    #[error("Action of rule '{rule}' failed: {message}")]
    ActionFailed { rule: String, message: String },
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Well-formed TOML with unacceptable content
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// A `--set key=value` override that cannot be applied
    #[error("Invalid override '{0}': expected key=value")]
    InvalidOverride(String),
}

/// Top-level error type for argo-rules
#[derive(Debug, thiserror::Error)]
pub enum ArgoError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
