//! Configuration management for Strata.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `strata.toml` file
//! 3. User config `~/.config/strata/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File walking configuration.
    pub walk: WalkConfig,

    /// Per-file extraction configuration.
    pub extract: ExtractConfig,

    /// Whole-run analysis configuration.
    pub analysis: AnalysisConfig,

    /// Artifact output configuration.
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./strata.toml` (project local)
    /// 2. `~/.config/strata/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Self::default().with_overrides(env_var)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.with_overrides(env_var)
    }

    /// Apply `STRATA_*` overrides read through `var`, then validate.
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(n) = var("STRATA_MAX_FILE_SIZE").and_then(|v| v.parse().ok()) {
            self.walk.max_file_size = n;
        }
        if let Some(n) = var("STRATA_DEADLINE_SECS").and_then(|v| v.parse().ok()) {
            self.analysis.deadline_secs = Some(n);
        }
        if let Some(n) = var("STRATA_CONTEXT_WINDOW").and_then(|v| v.parse().ok()) {
            self.extract.context_window = n;
        }
        if let Some(dir) = var("STRATA_OUTPUT_DIR") {
            self.output.dir = dir;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject settings that would make every run a no-op.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walk.max_file_size == 0 {
            return Err(ConfigError::Invalid(
                "walk.max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.analysis.deadline_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "analysis.deadline_secs must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// File walking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Files larger than this (in bytes) are skipped with a warning.
    pub max_file_size: u64,

    /// Directory names excluded at every depth.
    pub exclude_dirs: Vec<String>,

    /// File names treated as OpenAPI/Swagger documents.
    pub spec_file_names: Vec<String>,

    /// Honour `.gitignore` files inside git repositories.
    pub follow_gitignore: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            spec_file_names: DEFAULT_SPEC_FILE_NAMES.iter().map(|s| s.to_string()).collect(),
            follow_gitignore: true,
        }
    }
}

/// Per-file extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Characters kept on each side of a business-rule match.
    pub context_window: usize,

    /// Maximum business-rule candidates recorded per file.
    pub max_rules_per_file: usize,

    /// Whether business-rule candidates are collected at all.
    pub business_rules: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            max_rules_per_file: DEFAULT_MAX_RULES_PER_FILE,
            business_rules: true,
        }
    }
}

/// Whole-run analysis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Stop extracting new files once this many seconds have elapsed.
    pub deadline_secs: Option<u64>,
}

impl AnalysisConfig {
    /// The deadline as a duration, if one is configured.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Artifact output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory artifacts are written into.
    pub dir: String,

    /// Pretty-print JSON dumps.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUTPUT_DIR.to_string(),
            pretty_json: true,
        }
    }
}

impl OutputConfig {
    /// Output directory as a path.
    pub fn dir_path(&self) -> PathBuf {
        PathBuf::from(&self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.walk.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.extract.context_window, DEFAULT_CONTEXT_WINDOW);
        assert_eq!(config.output.dir, DEFAULT_OUTPUT_DIR);
        assert!(config.analysis.deadline().is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[walk]"));
        assert!(toml_str.contains("[extract]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[walk]
max_file_size = 2048
exclude_dirs = ["third_party"]

[analysis]
deadline_secs = 30

[output]
dir = "out/docs"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.walk.max_file_size, 2048);
        assert_eq!(config.walk.exclude_dirs, vec!["third_party".to_string()]);
        assert_eq!(config.analysis.deadline(), Some(Duration::from_secs(30)));
        assert_eq!(config.output.dir, "out/docs");
        // Untouched sections keep their defaults
        assert_eq!(config.extract.max_rules_per_file, DEFAULT_MAX_RULES_PER_FILE);
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config::default();
        config.walk.max_file_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.analysis.deadline_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        let zero_deadline = |name: &str| (name == "STRATA_DEADLINE_SECS").then(|| "0".to_string());
        assert!(matches!(
            Config::default().with_overrides(zero_deadline),
            Err(ConfigError::Invalid(_))
        ));

        let overrides = |name: &str| match name {
            "STRATA_DEADLINE_SECS" => Some("45".to_string()),
            "STRATA_CONTEXT_WINDOW" => Some("not a number".to_string()),
            "STRATA_OUTPUT_DIR" => Some("reports".to_string()),
            _ => None,
        };
        let config = Config::default().with_overrides(overrides).unwrap();
        assert_eq!(config.analysis.deadline(), Some(Duration::from_secs(45)));
        assert_eq!(config.extract.context_window, DEFAULT_CONTEXT_WINDOW);
        assert_eq!(config.output.dir, "reports");
    }
}
