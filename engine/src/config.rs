use std::fs;

use chrono_tz::Tz;
use thiserror::Error;

use alerting::boundary::AlertSchedule;
use preorder_core::constants::DEFAULT_PAGE_SIZE;
use preorder_core::{AlertBoundary, ChannelSubscription};

/// Configuration failures are fatal and reported once, before any fetch or
/// dispatch happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config load error: {0}")]
    Load(String),
    #[error("{0}")]
    Invalid(String),
    #[error("token file '{0}' not found")]
    MissingTokenFile(String),
    #[error("token file '{0}' is empty")]
    EmptyToken(String),
    #[error("channel file '{0}' not found")]
    MissingChannelFile(String),
    #[error("no valid channel subscriptions in '{0}'")]
    NoSubscriptions(String),
    #[error("malformed subscription on line {line}: '{text}' (expected 'channel_id,timezone')")]
    MalformedSubscription { line: usize, text: String },
    #[error("invalid channel id on line {line}: '{text}'")]
    InvalidChannelId { line: usize, text: String },
    #[error("unknown timezone on line {line}: '{text}'")]
    UnknownTimezone { line: usize, text: String },
}

#[derive(Debug, serde::Deserialize, Clone)]
pub struct BotConfig {
    #[serde(alias = "TOKEN_FILE", default = "default_token_file")]
    pub token_file: String,
    #[serde(alias = "CHANNELS_FILE", default = "default_channels_file")]
    pub channels_file: String,
    #[serde(alias = "CATALOG_URL")]
    pub catalog_url: String,
    #[serde(alias = "PAGE_SIZE", default = "default_page_size")]
    pub page_size: usize,
    #[serde(alias = "ALERT_BOUNDARY_DAYS", default = "default_boundary_days")]
    pub alert_boundary_days: String,
}

fn default_token_file() -> String {
    "token.txt".to_string()
}
fn default_channels_file() -> String {
    "channels.txt".to_string()
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_boundary_days() -> String {
    "7,3,1".to_string()
}

impl BotConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let s = ::config::Config::builder()
            .add_source(::config::Environment::default())
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let config: BotConfig = s
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values at startup (Fail Fast)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.catalog_url.starts_with("http") {
            return Err(ConfigError::Invalid(format!(
                "Invalid CATALOG_URL: must start with http/https. Got: {}",
                self.catalog_url
            )));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "PAGE_SIZE cannot be 0 (every batch would be empty)".to_string(),
            ));
        }
        self.boundary_days()?;
        Ok(())
    }

    /// Parse `ALERT_BOUNDARY_DAYS` (e.g. "7,3,1") into checkpoints.
    pub fn boundary_days(&self) -> Result<Vec<AlertBoundary>, ConfigError> {
        let mut boundaries = Vec::new();
        for part in self.alert_boundary_days.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let days: i64 = part.parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "invalid boundary day '{part}' in ALERT_BOUNDARY_DAYS"
                ))
            })?;
            let boundary = AlertBoundary::from_days(days).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "unsupported boundary day {days}; expected one of 7, 3, 1"
                ))
            })?;
            boundaries.push(boundary);
        }
        if boundaries.is_empty() {
            return Err(ConfigError::Invalid(
                "ALERT_BOUNDARY_DAYS must name at least one checkpoint".to_string(),
            ));
        }
        Ok(boundaries)
    }

    pub fn schedule(&self) -> Result<AlertSchedule, ConfigError> {
        Ok(AlertSchedule::new(self.boundary_days()?))
    }
}

/// Read the bot token. Missing or empty file is a configuration error.
pub fn load_token(path: &str) -> Result<String, ConfigError> {
    let raw =
        fs::read_to_string(path).map_err(|_| ConfigError::MissingTokenFile(path.to_string()))?;
    let token = raw.trim().to_string();
    if token.is_empty() {
        return Err(ConfigError::EmptyToken(path.to_string()));
    }
    Ok(token)
}

/// Parse the subscription file: one `channel_id,timezone` per line.
/// Any malformed line, bad id, or unresolvable timezone name fails the load.
pub fn load_subscriptions(path: &str) -> Result<Vec<ChannelSubscription>, ConfigError> {
    let raw =
        fs::read_to_string(path).map_err(|_| ConfigError::MissingChannelFile(path.to_string()))?;

    let mut subscriptions = Vec::new();
    for (index, row) in raw.lines().enumerate() {
        let row = row.trim();
        if row.is_empty() {
            continue;
        }
        let line = index + 1;

        let (id_part, tz_part) =
            row.split_once(',')
                .ok_or_else(|| ConfigError::MalformedSubscription {
                    line,
                    text: row.to_string(),
                })?;

        let channel_id: u64 =
            id_part
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidChannelId {
                    line,
                    text: id_part.trim().to_string(),
                })?;

        let timezone: Tz = tz_part
            .trim()
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone {
                line,
                text: tz_part.trim().to_string(),
            })?;

        subscriptions.push(ChannelSubscription {
            channel_id,
            timezone,
        });
    }

    if subscriptions.is_empty() {
        return Err(ConfigError::NoSubscriptions(path.to_string()));
    }
    Ok(subscriptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn base_config() -> BotConfig {
        BotConfig {
            token_file: "token.txt".to_string(),
            channels_file: "channels.txt".to_string(),
            catalog_url: "https://store.example".to_string(),
            page_size: 10,
            alert_boundary_days: "7,3,1".to_string(),
        }
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("CATALOG_URL", "https://store.example/api");
        env::set_var("TOKEN_FILE", "secrets/token.txt");
        env::set_var("CHANNELS_FILE", "secrets/channels.txt");

        let config = BotConfig::new().expect("Failed to load config");

        assert_eq!(config.catalog_url, "https://store.example/api");
        assert_eq!(config.token_file, "secrets/token.txt");
        assert_eq!(config.channels_file, "secrets/channels.txt");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.alert_boundary_days, "7,3,1");
    }

    #[test]
    fn test_config_validate_invalid_catalog_url() {
        let config = BotConfig {
            catalog_url: "not-a-url".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_zero_page_size() {
        let config = BotConfig {
            page_size: 0,
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_boundary_days_parse() {
        let config = base_config();
        assert_eq!(
            config.boundary_days().unwrap(),
            vec![
                AlertBoundary::SevenDays,
                AlertBoundary::ThreeDays,
                AlertBoundary::OneDay
            ]
        );

        let narrowed = BotConfig {
            alert_boundary_days: "1".to_string(),
            ..base_config()
        };
        assert_eq!(
            narrowed.boundary_days().unwrap(),
            vec![AlertBoundary::OneDay]
        );
    }

    #[test]
    fn test_boundary_days_rejects_unknown_checkpoints() {
        let config = BotConfig {
            alert_boundary_days: "7,2".to_string(),
            ..base_config()
        };
        assert!(config.boundary_days().is_err());

        let empty = BotConfig {
            alert_boundary_days: " , ".to_string(),
            ..base_config()
        };
        assert!(empty.boundary_days().is_err());
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
