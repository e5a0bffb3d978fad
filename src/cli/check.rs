//! `--check`: one-shot health probe of the backend.

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::api::HealthStatus;
use crate::error::ChatResult;

/// Line to print for a healthy backend, or the error to exit with.
pub fn health_report(base_url: &str, result: ChatResult<HealthStatus>) -> Result<String> {
    match result {
        Ok(health) if health.is_ok() => {
            Ok(format!("{}: ok ({} sessions)", base_url, health.sessions))
        }
        Ok(health) => Err(eyre!("{}: backend reported {:?}", base_url, health.status)),
        Err(e) => Err(eyre!("{}: {}", base_url, e.user_message())),
    }
}
