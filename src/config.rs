use crate::errors::{StockchatError, StockchatResult};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, time::Duration};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the inventory assistant backend, no trailing slash.
    pub api_base_url: String,
    /// AI replies can take a while; two minutes before a send is abandoned.
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub health_poll_interval_secs: u64,
    pub max_message_len: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 120,
            health_timeout_secs: 5,
            health_poll_interval_secs: 30,
            max_message_len: 500,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the config file if one exists, otherwise writes defaults out.
    /// The `STOCKCHAT_API_URL` environment variable always wins for the base
    /// URL so a dev backend can be pointed at without editing the file.
    pub fn load() -> StockchatResult<Config> {
        let config_path = config_file_path()?;

        let mut config = if config_path.exists() {
            let config_str = fs::read_to_string(&config_path).map_err(|e| {
                StockchatError::config_error(format!("Failed to read config file: {}", e))
            })?;
            serde_json::from_str(&config_str).map_err(|e| {
                StockchatError::config_error(format!("Failed to parse config: {}", e))
            })?
        } else {
            let config = Config::default();
            fs::create_dir_all(config_path.parent().unwrap_or(&config_path)).map_err(|e| {
                StockchatError::config_error(format!("Failed to create config directory: {}", e))
            })?;
            let config_str = serde_json::to_string_pretty(&config).map_err(|e| {
                StockchatError::config_error(format!("Failed to serialize config: {}", e))
            })?;
            fs::write(&config_path, config_str).map_err(|e| {
                StockchatError::config_error(format!("Failed to write config file: {}", e))
            })?;
            config
        };

        if let Ok(url) = env::var("STOCKCHAT_API_URL") {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().trim_end_matches('/').to_string();
            }
        }

        validate_config(&config)?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.health_poll_interval_secs)
    }
}

/// Directory holding the config file and the persisted login, shared with
/// `auth.rs`.
pub fn config_dir() -> StockchatResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| StockchatError::config_error("Could not determine home directory"))?;
    Ok(home_dir.join(".config").join("stockchat"))
}

fn config_file_path() -> StockchatResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

fn validate_config(config: &Config) -> StockchatResult<()> {
    if config.api_base_url.is_empty() {
        return Err(StockchatError::config_error("api_base_url is required"));
    }

    if config.request_timeout_secs == 0 {
        return Err(StockchatError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    if config.health_poll_interval_secs == 0 {
        return Err(StockchatError::config_error(
            "health_poll_interval_secs must be greater than 0",
        ));
    }

    if config.max_message_len == 0 {
        return Err(StockchatError::config_error(
            "max_message_len must be greater than 0",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_empty_base_url() {
        let mut config = Config::default();
        config.api_base_url = "".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_zero_timeout() {
        let mut config = Config::default();
        config.request_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(Config::default().api_base_url, "http://localhost:3001/api");
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_base_url, config.api_base_url);
        assert_eq!(parsed.request_timeout_secs, 120);
    }
}
