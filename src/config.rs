use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Config file read when `DOCSERVE_CONFIG` is unset and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "docserve.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub document_root: PathBuf,
    /// Connections served concurrently.
    pub workers: usize,
    pub read_timeout_secs: u64,
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            document_root: PathBuf::from("."),
            workers: 10,
            read_timeout_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Config {
    /// Loads the configuration for the host binary.
    ///
    /// Reads the YAML file named by `DOCSERVE_CONFIG`, or
    /// [`DEFAULT_CONFIG_FILE`] if present, then applies the `DOCSERVE_PORT`
    /// and `DOCSERVE_ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("DOCSERVE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(port) = std::env::var("DOCSERVE_PORT") {
            cfg.server.port = port
                .parse()
                .with_context(|| format!("invalid DOCSERVE_PORT: {}", port))?;
        }
        if let Ok(root) = std::env::var("DOCSERVE_ROOT") {
            cfg.server.document_root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
