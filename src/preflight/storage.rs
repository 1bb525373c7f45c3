//! Cache directory preflight check.

use super::CheckResult;
use crate::utils::fs;
use std::path::Path;

/// Check that snapshots can be written to the cache directory.
pub fn check(cache_dir: &Path) -> CheckResult {
    if fs::is_writable_dir(cache_dir) {
        CheckResult::ok("Cache", &cache_dir.display().to_string())
    } else {
        CheckResult::fail(
            "Cache",
            &format!("{} is not writable", cache_dir.display()),
            "Fix permissions or set cache_dir in config.toml",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_writable_dir() {
        let dir = TempDir::new().unwrap();
        assert!(check(&dir.path().join("cache")).success);
    }

    #[test]
    fn test_check_file_is_not_a_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        let result = check(&file);
        assert!(!result.success);
        assert!(result.hint.is_some());
    }
}
