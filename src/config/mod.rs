//! Configuration management for pre-commit-mcp
//!
//! Configuration is layered with figment: built-in defaults, then user and
//! repository files (or one explicit file), then `PRE_COMMIT_MCP_` environment
//! variables. It is loaded once at startup and handed to the pipeline as a
//! plain value.

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod smart_load;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "PRE_COMMIT_MCP_";

/// Base name of repository-level config files (`pre-commit-mcp.toml`, ...)
pub const REPO_CONFIG_STEM: &str = "pre-commit-mcp";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Hook runner invocation
    pub runner: RunnerConfig,

    /// Report shaping
    pub report: ReportConfig,

    /// MCP server identity
    pub server: ServerConfig,
}

/// How the hook runner subprocess is launched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Executable name or path
    pub executable: String,

    /// Arguments selecting staged-files mode
    pub args: Vec<String>,

    /// Hard execution budget (seconds)
    pub timeout_secs: u64,

    /// Runner configuration file expected at the working root
    pub config_file: String,

    /// Refuse to launch when `config_file` is missing
    pub require_config: bool,
}

/// Limits applied while normalizing runner output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Per-hook detail cap, in characters
    pub max_detail_chars: usize,

    /// Maximum number of `[INFO]`/`[WARNING]` lines kept
    pub max_warnings: usize,
}

/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Name reported in `serverInfo`
    pub name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: "pre-commit".to_string(),
            args: vec!["run".to_string(), "--color=never".to_string()],
            timeout_secs: 60,
            config_file: ".pre-commit-config.yaml".to_string(),
            require_config: true,
        }
    }
}

impl RunnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_detail_chars: 1000,
            max_warnings: 20,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "pre-commit-mcp".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the standard locations
    pub fn load(custom_config: Option<&Path>) -> Result<Self> {
        if let Some(path) = custom_config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }

        let config: Config = Self::figment(custom_config)
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Build the layered provider stack without extracting it
    pub fn figment(custom_config: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        // An explicit file replaces the user and repository layers
        if let Some(path) = custom_config {
            figment = figment.merge(smart_load::auto(path));
        } else {
            let user = Self::user_config_stem();
            figment = figment
                .merge(Toml::file(format!("{user}.toml")))
                .merge(Json::file(format!("{user}.json")))
                .merge(Yaml::file(format!("{user}.yaml")))
                .merge(Yaml::file(format!("{user}.yml")))
                .merge(Toml::file(format!("{REPO_CONFIG_STEM}.toml")))
                .merge(Json::file(format!("{REPO_CONFIG_STEM}.json")))
                .merge(Yaml::file(format!("{REPO_CONFIG_STEM}.yaml")))
                .merge(Yaml::file(format!("{REPO_CONFIG_STEM}.yml")));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.runner.executable.trim().is_empty() {
            anyhow::bail!("runner.executable cannot be empty");
        }

        if self.runner.timeout_secs == 0 {
            anyhow::bail!("runner.timeout_secs cannot be 0");
        }

        if self.report.max_detail_chars == 0 {
            anyhow::bail!("report.max_detail_chars cannot be 0");
        }

        Ok(())
    }

    fn user_config_stem() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/pre-commit-mcp/config"),
            Err(_) => "~/.config/pre-commit-mcp/config".to_string(),
        }
    }
}
