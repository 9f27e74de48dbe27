use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub const DEFAULT_API_BASE: &str = "http://localhost:8090";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const API_BASE_ENV: &str = "GEODELIVERY_API_BASE";
pub const TOKEN_ENV: &str = "GEODELIVERY_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config file: {0}")]
  Read(#[from] std::io::Error),
  #[error("Failed to parse config: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Everything the API client needs to reach the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
  pub api_base: String,
  pub token: Option<String>,
  pub timeout_ms: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    ClientConfig {
      api_base: DEFAULT_API_BASE.to_string(),
      token: None,
      timeout_ms: DEFAULT_TIMEOUT_MS,
    }
  }
}

impl ClientConfig {
  pub fn from_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    info!("Reading config from {}", path.display());
    let config = serde_json::from_reader(File::open(path)?)?;
    Ok(config)
  }

  /// Reads `path` when given, then applies environment overrides.
  pub fn load(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let mut config = match path {
      Some(path) => ClientConfig::from_file(path)?,
      None => {
        info!("No config file given, using defaults");
        ClientConfig::default()
      }
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
  }

  pub fn apply_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(api_base) = lookup(API_BASE_ENV) {
      info!("{} set, using {}", API_BASE_ENV, api_base);
      self.api_base = api_base;
    }
    if let Some(token) = lookup(TOKEN_ENV) {
      info!("{} set, using token from environment", TOKEN_ENV);
      self.token = Some(token);
    }
  }

  pub fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.api_base.trim_end_matches('/'), path)
  }
}
