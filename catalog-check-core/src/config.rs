use crate::logging::LogLevel;
use crate::source::SourceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "catalog-check.toml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub enabled: bool,
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: ReportFormat::Text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub events_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            events_file: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub source: SourceConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Invalid { path: String, reason: String },
}

impl CheckConfig {
    pub fn from_toml(raw: &str, path: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        cfg.check(path)?;
        Ok(cfg)
    }

    /// Rejects values that parse but cannot work, such as a zero timeout
    /// that would fail every fetch before it is sent.
    pub fn check(&self, path: &str) -> Result<(), ConfigError> {
        if let SourceConfig::Http {
            timeout_ms: Some(0),
            ..
        } = self.source
        {
            return Err(ConfigError::Invalid {
                path: path.to_string(),
                reason: "source.timeout_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Loads `path`, or `catalog-check.toml` when none is given. A missing
    /// default file yields the built-in defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        let shown = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw, &shown),
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: shown,
                source,
            }),
        }
    }
}
