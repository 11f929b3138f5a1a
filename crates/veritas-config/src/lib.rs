use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { key: key.to_string(), reason: reason.into() }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Environment Keys
// ─────────────────────────────────────────────────────────────────────────────

pub const ENV_CONFIG_FILE: &str = "VERITAS_CONFIG";
pub const ENV_HOST: &str = "VERITAS_HOST";
pub const ENV_PORT: &str = "VERITAS_PORT";
pub const ENV_MODEL_DIR: &str = "VERITAS_MODEL_DIR";
pub const ENV_CORS_ORIGINS: &str = "VERITAS_CORS_ORIGINS";

// ─────────────────────────────────────────────────────────────────────────────
// Model Location
// ─────────────────────────────────────────────────────────────────────────────

/// Where the serialized pipeline lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    /// Directory holding both the extracted model and its archive.
    pub dir: PathBuf,
    /// File name of the extracted model.
    pub file: String,
    /// File name of the compressed archive containing `file`.
    pub archive: String,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            file: "model.json".into(),
            archive: "model.zip".into(),
        }
    }
}

impl ModelPaths {
    pub fn extracted_path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.dir.join(&self.archive)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Config
// ─────────────────────────────────────────────────────────────────────────────

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".into(),
        "http://127.0.0.1:5173".into(),
        "http://localhost:3000".into(),
        "http://127.0.0.1:3000".into(),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model: ModelPaths,
    /// Origins allowed to make cross-origin requests.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            model: ModelPaths::default(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from the process environment: the optional
    /// JSON file named by `VERITAS_CONFIG`, then individual overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an explicit variable lookup.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(ENV_CONFIG_FILE) {
            Some(path) => {
                tracing::info!("Loading config from {}", path);
                Self::from_file(Path::new(&path))?
            }
            None => Self::default(),
        };

        let config = base.with_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON document. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_PORT, format!("'{}' is not a port number", port)))?;
        }

        if let Some(dir) = lookup(ENV_MODEL_DIR) {
            self.model.dir = PathBuf::from(dir);
        }

        if let Some(origins) = lookup(ENV_CORS_ORIGINS) {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid("host", "must not be empty"));
        }
        if self.model.file.is_empty() {
            return Err(ConfigError::invalid("model.file", "must not be empty"));
        }
        if self.cors_origins.is_empty() {
            return Err(ConfigError::invalid("cors_origins", "at least one origin is required"));
        }
        for origin in &self.cors_origins {
            let well_formed = (origin.starts_with("http://") || origin.starts_with("https://"))
                && origin.bytes().all(|b| b.is_ascii_graphic());
            if !well_formed {
                return Err(ConfigError::invalid("cors_origins", format!("'{}' is not an origin", origin)));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
