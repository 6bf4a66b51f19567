use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::JsonStorage;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Directory holding food_database.json and food_name_index.json
    pub data_dir: PathBuf,
    /// Directory of static assets served by the server
    pub public_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("."),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path
            .or_else(|| std::env::var("NUTRIDB_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(host) = std::env::var("NUTRIDB_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("NUTRIDB_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("NUTRIDB_PORT", port))?;
        }
        if let Ok(data_dir) = std::env::var("NUTRIDB_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(public_dir) = std::env::var("NUTRIDB_PUBLIC_DIR") {
            config.public_dir = PathBuf::from(public_dir);
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/nutridb/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutridb")
            .join("config.yaml")
    }

    /// Storage for the two data files in `data_dir`.
    pub fn storage(&self) -> JsonStorage {
        JsonStorage::new(&self.data_dir)
    }

    /// `host:port` for binding the server.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
            ConfigError::InvalidEnv(var, value) => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError(_, e) => Some(e),
            ConfigError::ParseError(_, e) => Some(e),
            ConfigError::InvalidEnv(..) => None,
        }
    }
}
