/*!
 * Configuration types
 */

use serde::{Deserialize, Serialize};

use crate::sync::DEFAULT_CONCURRENCY;
use crate::utils::error::{app_error, AppResult};
use crate::utils::logging::init_logging;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashConfig {
    pub sync: SyncConfig,
    pub responses: ResponseConfig,
    pub logging: LoggingConfig,
}

impl SlashConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.sync.concurrency == 0 {
            crate::app_bail!("sync.concurrency must be at least 1");
        }
        if self.responses.no_implementation.trim().is_empty() {
            crate::app_bail!("responses.no_implementation must not be empty");
        }
        if self.responses.failure.trim().is_empty() {
            crate::app_bail!("responses.failure must not be empty");
        }
        Ok(())
    }
}

/// Reconciliation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Whether the ready trigger reconciles at all.
    pub enabled: bool,
    /// Upper bound on in-flight remote calls per pass.
    pub concurrency: usize,
    /// Reconcile guild scopes concurrently once the global pass is done.
    pub parallel_guilds: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: DEFAULT_CONCURRENCY,
            parallel_guilds: true,
        }
    }
}

/// Texts sent to requesters when the router answers on a handler's behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    pub no_implementation: String,
    pub failure: String,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            no_implementation: "No implementation".to_string(),
            failure: "This command failed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    /// Installs the global subscriber at the configured level.
    pub fn init(&self) -> AppResult<()> {
        init_logging(&self.level).map_err(app_error)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
