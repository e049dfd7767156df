//! Client configuration using Figment
//!
//! Sources, later overriding earlier:
//! 1. Defaults
//! 2. Global file: `<config dir>/kanban-sync/config.{toml,yaml}`
//! 3. Project file: `./.kanban-sync.{toml,yaml}`
//! 4. Environment: `KANBAN_SYNC_BASE_URL`, `KANBAN_SYNC_AUTH_TOKEN`, ...
//!
//! Command-line overrides are merged on top by the caller.

use crate::error::{KanbanError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, trace};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KANBAN_SYNC_";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const PROJECT_FILE_STEM: &str = ".kanban-sync";

/// Settings for talking to the board server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root; API paths are appended to it
    pub base_url: String,
    /// JWT sent as `Authorization: JWT <token>`
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// How many settled operations the session keeps in its activity log
    pub activity_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            timeout_secs: 30,
            activity_capacity: 200,
        }
    }
}

impl ClientConfig {
    /// Load from every source in precedence order
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    /// The figment with every standard source merged, for callers that add overrides
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(dir) = global_config_dir() {
            trace!("Global config directory: {}", dir.display());
            figment = figment
                .merge(Toml::file(dir.join("config.toml")))
                .merge(Yaml::file(dir.join("config.yaml")));
        }

        figment
            .merge(Toml::file(format!("{PROJECT_FILE_STEM}.toml")))
            .merge(Yaml::file(format!("{PROJECT_FILE_STEM}.yaml")))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract and validate a configuration from an arbitrary figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        debug!(base_url = %config.base_url, "Loaded client configuration");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(KanbanError::invalid_value(
                "base_url",
                format!("expected an http(s) URL, got '{}'", self.base_url),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(KanbanError::invalid_value(
                "timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kanban-sync"))
}
