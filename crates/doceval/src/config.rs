//! Project configuration file support for doceval.
//!
//! Loads configuration from `doceval.toml` in the working directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use doceval_agent::AgentConfig;

/// Project-level configuration loaded from `doceval.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Global default model (applies to both scorer and rewriter)
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: Option<String>,
    /// Retries for rate-limited or failed requests
    pub max_retries: Option<u32>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Scorer-specific configuration
    #[serde(default)]
    pub scorer: RoleConfig,
    /// Rewriter-specific configuration
    #[serde(default)]
    pub rewriter: RoleConfig,
    /// Defaults for the auto-improve command
    #[serde(default)]
    pub auto_improve: AutoImproveConfig,
}

/// Configuration for a specific role (scorer or rewriter)
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    /// Model to use for this role
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AutoImproveConfig {
    pub iterations: Option<usize>,
    pub target: Option<f64>,
}

/// Which side of the loop a chat model serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Scorer,
    Rewriter,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "doceval.toml";

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Get the effective model for a role.
    /// Priority: [role].model > global model > None
    pub fn role_model(&self, role: Role) -> Option<&str> {
        let section = match role {
            Role::Scorer => &self.scorer,
            Role::Rewriter => &self.rewriter,
        };
        section.model.as_deref().or(self.model.as_deref())
    }

    /// Build the client configuration for a role.
    /// Model priority: CLI flag > [role].model > global model > built-in default
    pub fn agent_config(&self, api_key: &str, role: Role, cli_model: Option<&str>) -> AgentConfig {
        let mut config = AgentConfig::new(api_key);

        if let Some(model) = cli_model.or(self.role_model(role)) {
            config = config.with_model(model);
        }
        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(retries) = self.max_retries {
            config = config.with_max_retries(retries);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config
    }
}
