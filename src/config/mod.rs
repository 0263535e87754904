// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::plugin::batch::DEFAULT_OUTPUT_PREFIX;
use crate::watermark::{WatermarkOptions, WatermarkSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Watermark options; anything left out takes its default
    #[serde(default)]
    pub watermark: WatermarkOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Log line format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_output_prefix() -> String {
    DEFAULT_OUTPUT_PREFIX.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// File name prefix for watermarked copies (default: "watermarked-")
    #[serde(default = "default_output_prefix")]
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: default_output_prefix(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            ));
        }

        // An empty document means "all defaults"
        if substituted.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Apply command-line overrides on top of the file's watermark options.
    pub fn with_overrides(mut self, overrides: &WatermarkOptions) -> Self {
        self.watermark = self.watermark.merge(overrides);
        self
    }

    /// Concrete watermark settings after applying defaults.
    pub fn settings(&self) -> WatermarkSettings {
        self.watermark.resolve()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.output.prefix.is_empty() {
            return Err("output.prefix cannot be empty".to_string());
        }
        if self.output.prefix.contains(|c: char| c == '/' || c == '\\') {
            return Err(format!(
                "output.prefix '{}' must not contain path separators",
                self.output.prefix
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err("logging.level cannot be empty".to_string());
        }

        self.settings()
            .validate()
            .map_err(|e| format!("watermark: {}", e))
    }
}
