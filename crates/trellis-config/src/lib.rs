//! Configuration management for Trellis.
//!
//! Parses `trellis.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Page Defaults
//!
//! `[pages.defaults]` holds the field values applied to every new page;
//! `[pages.route_defaults.<route>]` replaces them for pages created with
//! that route name. Field names are checked by the page manager when it is
//! constructed, not here.
//!
//! ## Environment Variable Expansion
//!
//! `blocks.template_dir` supports `${VAR}` and `${VAR:-default}`.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Field values keyed by page field name.
pub type FieldMap = BTreeMap<String, serde_json::Value>;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override block template directory.
    pub template_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "trellis.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page creation defaults.
    pub pages: PagesConfig,
    /// Block rendering configuration (paths are relative strings from TOML).
    blocks: BlocksConfigRaw,

    /// Resolved blocks configuration (set after loading).
    #[serde(skip)]
    pub blocks_resolved: BlocksConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Page creation defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Defaults applied when no route-specific set matches.
    pub defaults: FieldMap,
    /// Defaults keyed by route name.
    pub route_defaults: BTreeMap<String, FieldMap>,
}

/// Raw blocks configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BlocksConfigRaw {
    template_dir: Option<String>,
}

/// Resolved blocks configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BlocksConfig {
    /// Directory with block template overrides.
    pub template_dir: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`blocks.template_dir`").
        field: String,
        /// Error message (e.g., "${`TRELLIS_TEMPLATES`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `trellis.toml` in current directory and parents,
    /// falling back to an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(template_dir) = &settings.template_dir {
            self.blocks_resolved.template_dir = Some(template_dir.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a route default set has an empty
    /// route name or overrides `route_name` with a different route.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (route, fields) in &self.pages.route_defaults {
            if route.is_empty() {
                return Err(ConfigError::Validation(
                    "pages.route_defaults keys cannot be empty".to_owned(),
                ));
            }

            let overridden = fields
                .get("route_name")
                .or_else(|| fields.get("routeName"))
                .and_then(serde_json::Value::as_str);
            if let Some(other) = overridden
                && other != route
            {
                return Err(ConfigError::Validation(format!(
                    "pages.route_defaults.{route}.route_name must be \"{route}\", found \"{other}\""
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variables and resolve relative paths against the
    /// config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let template_dir = match &self.blocks.template_dir {
            Some(raw) => {
                let expanded = expand::expand_env(raw, "blocks.template_dir")?;
                Some(config_dir.join(expanded))
            }
            None => None,
        };

        self.blocks_resolved = BlocksConfig { template_dir };
        Ok(())
    }
}
