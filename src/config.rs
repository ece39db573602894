use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::health::DEFAULT_VOLUME_CAPACITY;
use crate::models::status::Cluster;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_volume_capacity")]
    pub volume_capacity: u32,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

fn default_listen_port() -> u16 {
    9090
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_volume_capacity() -> u32 {
    DEFAULT_VOLUME_CAPACITY
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("reading config {}: {}", path.display(), e))?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut cfg: Config =
            serde_yaml::from_str(data).map_err(|e| format!("parsing config: {}", e))?;

        cfg.api_url = cfg.api_url.trim().trim_end_matches('/').to_string();
        if cfg.api_url.is_empty() {
            return Err("api_url must be configured".into());
        }
        cfg.api_base()?;
        if cfg.volume_capacity == 0 {
            return Err("volume_capacity must be greater than zero".into());
        }

        Ok(cfg)
    }

    /// `api_url` as a base that endpoint path segments can be appended to.
    pub fn api_base(&self) -> Result<Url, Box<dyn std::error::Error>> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| format!("invalid api_url {}: {}", self.api_url, e))?;
        if url.cannot_be_a_base() {
            return Err(format!("api_url {} cannot hold a path", self.api_url).into());
        }
        Ok(url)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
