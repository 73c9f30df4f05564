/*!
 * TOML config loader
 *
 * A missing file yields defaults. A file that exists but does not parse or
 * validate is an error; the caller decides whether to fall back.
 */

use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::types::SlashConfig;
use crate::utils::error::{app_error, AppResult};

const APP_DIR: &str = "slash-registry";
const CONFIG_FILE: &str = "config.toml";

impl SlashConfig {
    /// `<config dir>/slash-registry/config.toml`
    pub fn default_path() -> AppResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| app_error("no config directory on this platform"))?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !fs::try_exists(path)
            .await
            .with_context(|| format!("cannot access config file {}", path.display()))?
        {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: SlashConfig = toml::from_str(content).context("TOML parse failed")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> AppResult<String> {
        toml::to_string_pretty(self).context("TOML serialization failed")
    }
}
