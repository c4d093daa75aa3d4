//! Client configuration: YAML file plus environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_EIA_URL: &str =
    "https://api.eia.gov/v2/electricity/state-electricity-profiles/energy-efficiency/data/";

pub const ENV_API_URL: &str = "ENERGYINSIGHT_API_URL";
pub const ENV_EIA_API_KEY: &str = "EIA_API_KEY";
pub const ENV_SESSION: &str = "ENERGYINSIGHT_SESSION";
/// Config file path for front ends without a `--config` flag.
pub const ENV_CONFIG: &str = "ENERGYINSIGHT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub eia_url: String,
    pub eia_api_key: Option<String>,
    pub session_path: Option<PathBuf>,
    pub timeout_s: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            eia_url: DEFAULT_EIA_URL.to_string(),
            eia_api_key: None,
            session_path: None,
            timeout_s: 30,
        }
    }
}

impl ClientConfig {
    /// Read `path` if given, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ClientError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Override fields from `lookup` (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(key) = lookup(ENV_EIA_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.eia_api_key = Some(key);
        }
        if let Some(path) = lookup(ENV_SESSION).filter(|v| !v.trim().is_empty()) {
            self.session_path = Some(PathBuf::from(path));
        }
    }

    /// Session file location: configured path, else `~/.energyinsight/session.json`.
    pub fn session_file(&self) -> PathBuf {
        if let Some(path) = &self.session_path {
            return path.clone();
        }
        let base = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        base.join(".energyinsight").join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: ClientConfig = serde_yaml::from_str("api_url: https://api.example.com\n").unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.eia_url, DEFAULT_EIA_URL);
        assert_eq!(config.timeout_s, 30);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| match key {
            ENV_API_URL => Some("http://backend:9000".into()),
            ENV_EIA_API_KEY => Some("abc123".into()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://backend:9000");
        assert_eq!(config.eia_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.session_path, None);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|_| Some("  ".into()));
        assert_eq!(config, ClientConfig::default());
    }
}
