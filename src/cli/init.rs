//! Initialize an argo-rules project
//!
//! Writes a commented sample argo.toml that seeds a dice-pool context and
//! declares two rules reading the roll's outcome.

use crate::config::CONFIG_FILE;
use std::fs;
use std::path::Path;

/// Default content for argo.toml
const DEFAULT_ARGO_TOML: &str = r#"[argo]
version = "1"

# Values handed to the rule set. The D10Roll rule fires when both
# dice_pool and difficulty are present and writes rolls and successes.
[context]
dice_pool = 5
difficulty = 7

[output]
format = "human"
# color = "auto"

# Declared rules run after D10Roll, in file order. Each fires when its
# `when` expression is truthy and then applies its effects (set, add, multiply).
[[rules]]
name = "Triumph"
description = "Marks rolls with three or more successes."
when = { op = "gte", left = { op = "field", key = "successes" }, right = { op = "literal", value = 3 } }
effects = [
    { type = "set", target = "outcome", value = { op = "literal", value = "triumph" } },
]

[[rules]]
name = "Botch"
description = "Marks rolls without a single success."
when = { op = "eq", left = { op = "field", key = "successes" }, right = { op = "literal", value = 0 } }
effects = [
    { type = "set", target = "outcome", value = { op = "literal", value = "botch" } },
]
"#;

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path error
    #[error("Path error: {0}")]
    Path(String),
}

/// Result of init command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitResult {
    /// Files that were created
    pub created: Vec<String>,
    /// Files that were skipped (already existed)
    pub skipped: Vec<String>,
    /// Files that were overwritten
    pub overwritten: Vec<String>,
}

/// Run the init command in `dir`
///
/// # Arguments
/// * `dir` - Directory to write argo.toml into
/// * `force` - If true, overwrite an existing argo.toml
pub fn run_init(dir: &Path, force: bool) -> Result<InitResult, InitError> {
    let mut result = InitResult::default();

    if !dir.is_dir() {
        return Err(InitError::Path(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        if force {
            fs::write(&path, DEFAULT_ARGO_TOML)?;
            result.overwritten.push(CONFIG_FILE.to_string());
        } else {
            result.skipped.push(CONFIG_FILE.to_string());
        }
    } else {
        fs::write(&path, DEFAULT_ARGO_TOML)?;
        result.created.push(CONFIG_FILE.to_string());
    }

    tracing::debug!(?result, "Init finished");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config() {
        let temp_dir = TempDir::new().unwrap();
        let result = run_init(temp_dir.path(), false).expect("init should succeed");

        assert_eq!(result.created, vec!["argo.toml"]);
        assert!(result.skipped.is_empty());
        assert!(result.overwritten.is_empty());

        let content = fs::read_to_string(temp_dir.path().join("argo.toml")).unwrap();
        assert!(content.contains("[argo]"));
        assert!(content.contains("dice_pool = 5"));
    }

    #[test]
    fn test_init_skips_existing_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("argo.toml");
        fs::write(&path, "existing content").unwrap();

        let result = run_init(temp_dir.path(), false).expect("init should succeed");

        assert_eq!(result.skipped, vec!["argo.toml"]);
        assert!(result.created.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing content");
    }

    #[test]
    fn test_init_overwrites_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("argo.toml");
        fs::write(&path, "old content").unwrap();

        let result = run_init(temp_dir.path(), true).expect("init should succeed");

        assert_eq!(result.overwritten, vec!["argo.toml"]);
        assert_ne!(fs::read_to_string(&path).unwrap(), "old content");
    }

    #[test]
    fn test_init_rejects_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let err = run_init(&missing, false).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::parse(DEFAULT_ARGO_TOML).expect("sample config should parse");
        assert_eq!(config.context.require_i64("dice_pool").unwrap(), 5);
        assert_eq!(config.context.require_i64("difficulty").unwrap(), 7);
        let names: Vec<&str> = config.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Triumph", "Botch"]);
    }
}
