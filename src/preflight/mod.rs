//! Preflight checks module.

mod api;
mod storage;

use crate::models::Config;
use crate::Result;
use colored::Colorize;

/// Result of a preflight check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}

/// Run all preflight checks.
pub async fn run_preflight_checks(config: &Config) -> Result<Vec<CheckResult>> {
    let mut results = Vec::new();

    results.push(storage::check(&config.cache_dir));

    if config.account_id.is_none() {
        results.push(CheckResult::fail(
            "Account",
            "not configured",
            "Set account_id in config.toml or pass --account",
        ));
    }

    results.push(api::check(&config.api).await);

    Ok(results)
}

/// Print preflight check results.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        if result.success {
            println!(
                "{} {}: {}",
                "[OK]".green(),
                result.name.bold(),
                result.message
            );
        } else {
            println!(
                "{} {}: {}",
                "[FAIL]".red(),
                result.name.bold(),
                result.message
            );
            if let Some(ref hint) = result.hint {
                println!("  {} {}", "->".yellow(), hint);
            }
        }
    }
}

/// Check if all preflight checks passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_passed() {
        let results = vec![
            CheckResult::ok("Cache", "/tmp"),
            CheckResult::fail("Backend API", "token rejected", "Refresh your token"),
        ];
        assert!(!all_passed(&results));
        assert!(all_passed(&results[..1]));
        assert!(all_passed(&[]));
    }
}
