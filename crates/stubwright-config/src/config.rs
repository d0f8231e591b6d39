//! Configuration management for stubwright

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use stubwright_foundation::{StubError, StubResult};

/// Framework identifier used when nothing else is configured
pub const DEFAULT_FRAMEWORK: &str = "junit4";

/// Name prefix selecting test methods in batch mode
pub const DEFAULT_METHOD_PREFIX: &str = "test";

/// Config files searched, in order, relative to the base directory
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["stubwright.toml", ".stubwright/config.toml"];

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "STUBWRIGHT__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Test framework selection
    #[serde(default)]
    pub testing: TestingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Test framework selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestingConfig {
    /// Framework identifier (junit3, junit4, testng)
    pub framework: String,
    /// Per-project framework overrides (project name -> identifier)
    #[serde(default)]
    pub projects: HashMap<String, String>,
    /// Name prefix of test methods processed in batch mode
    pub prefix: String,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for tooling
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for TestingConfig {
    fn default() -> Self {
        Self {
            framework: DEFAULT_FRAMEWORK.to_string(),
            projects: HashMap::new(),
            prefix: DEFAULT_METHOD_PREFIX.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl TestingConfig {
    /// Framework identifier for a project, falling back to the global setting
    pub fn framework_for(&self, project: Option<&str>) -> &str {
        project
            .and_then(|name| self.projects.get(name))
            .map(String::as_str)
            .unwrap_or(&self.framework)
    }
}

impl AppConfig {
    /// Load configuration relative to the current directory
    pub fn load() -> StubResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| StubError::config(format!("Failed to read current directory: {}", e)))?;
        Self::load_from(&cwd)
    }

    /// Load configuration relative to `base_dir`
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`STUBWRIGHT__*`, `__` separates nesting levels)
    /// 2. The first of `stubwright.toml`, `.stubwright/config.toml` found in `base_dir`
    /// 3. Default values
    pub fn load_from(base_dir: &Path) -> StubResult<Self> {
        let config_file = CONFIG_FILE_CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.exists());

        Self::load_layers(config_file)
    }

    /// Load configuration from an explicit file (plus env overrides)
    pub fn load_file(path: &Path) -> StubResult<Self> {
        if !path.exists() {
            return Err(StubError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        Self::load_layers(Some(path.to_path_buf()))
    }

    fn load_layers(config_file: Option<PathBuf>) -> StubResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "Loading TOML configuration");
            figment = figment.merge(Toml::file(path));
        }

        let figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .split("__")
                .map(|k| k.as_str().to_lowercase().into()),
        );

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| StubError::config(format!("Failed to load configuration: {}", e)))?;

        app_config.validate()?;

        tracing::debug!(
            framework = %app_config.testing.framework,
            project_overrides = app_config.testing.projects.len(),
            "Configuration loaded successfully"
        );

        Ok(app_config)
    }

    /// Validate the configuration
    ///
    /// Framework identifiers are resolved by the caller against the closed
    /// framework set; only their presence is checked here.
    fn validate(&self) -> StubResult<()> {
        if self.testing.framework.trim().is_empty() {
            return Err(StubError::config("testing.framework cannot be empty"));
        }

        if let Some((project, _)) = self
            .testing
            .projects
            .iter()
            .find(|(_, identifier)| identifier.trim().is_empty())
        {
            return Err(StubError::config(format!(
                "testing.projects.{} cannot be empty",
                project
            )));
        }

        if self.testing.prefix.is_empty() {
            return Err(StubError::config("testing.prefix cannot be empty"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(StubError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }
}
