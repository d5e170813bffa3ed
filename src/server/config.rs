use std::net::SocketAddr;
use std::path::PathBuf;

use crate::pipeline::DEFAULT_ARTIFACT_PATH;

/// Prediction server settings, read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `MODEL_PATH`, loading a `.env` file first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let host = lookup("HOST")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => defaults.port,
        };

        let model_path = lookup("MODEL_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        Ok(Self {
            host,
            port,
            model_path,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid listen address {}:{}", self.host, self.port))
    }
}
