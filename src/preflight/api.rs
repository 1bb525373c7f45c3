//! Backend API preflight check.

use super::CheckResult;
use crate::models::ApiConfig;
use crate::services::HttpRemote;

/// Check if the backend answers and accepts the configured token.
pub async fn check(config: &ApiConfig) -> CheckResult {
    if config.token.is_none() {
        return CheckResult::fail(
            "Backend API",
            "token not configured",
            "Set KEEPWATCHING_TOKEN or api.token in config.toml",
        );
    }

    let remote = match HttpRemote::new(config.clone()) {
        Ok(remote) => remote,
        Err(e) => {
            return CheckResult::fail(
                "Backend API",
                &format!("cannot build client: {}", e),
                "Check api.timeout_secs in config.toml",
            )
        }
    };

    match remote.verify_connection().await {
        Ok(true) => CheckResult::ok("Backend API", &format!("connected to {}", remote.base_url())),
        Ok(false) => CheckResult::fail(
            "Backend API",
            "token rejected",
            "Refresh your KEEPWATCHING_TOKEN",
        ),
        Err(_) => CheckResult::fail(
            "Backend API",
            &format!("{} unreachable", remote.base_url()),
            "Check your network connection or KEEPWATCHING_API_URL",
        ),
    }
}
