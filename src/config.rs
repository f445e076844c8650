//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::error::AppError;

/// Cog toggles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Features {
    pub nabg: bool,
    pub teams: bool,
    pub lfg: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            nabg: true,
            teams: true,
            lfg: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub prefix: String,
    pub data_path: PathBuf,
    pub logs_path: PathBuf,
    /// Lifetime of paginators and confirmation prompts.
    pub interaction_timeout: Duration,
    pub sweep_interval: Duration,
    pub features: Features,
}

impl Config {
    /// Creates a config with defaults and no token. Call [`Config::load`] to
    /// read the environment.
    pub fn new() -> Self {
        Self {
            discord_token: String::new(),
            prefix: "!".to_string(),
            data_path: PathBuf::from("./data"),
            logs_path: PathBuf::from("./logs"),
            interaction_timeout: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(5),
            features: Features::default(),
        }
    }

    pub fn load(&mut self) -> Result<(), AppError> {
        self.discord_token = std::env::var("DISCORD_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AppError::MissingConfig {
                key: "DISCORD_TOKEN".to_string(),
            })?;

        if let Ok(prefix) = std::env::var("COMMAND_PREFIX")
            && !prefix.trim().is_empty()
        {
            self.prefix = prefix.trim().to_string();
        }
        if let Ok(path) = std::env::var("DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LOGS_PATH") {
            self.logs_path = PathBuf::from(path);
        }

        self.interaction_timeout = Duration::from_secs(parse_env(
            "INTERACTION_TIMEOUT_SECS",
            self.interaction_timeout.as_secs(),
        ));
        self.sweep_interval =
            Duration::from_secs(parse_env("SWEEP_INTERVAL_SECS", self.sweep_interval.as_secs()).max(1));

        self.features = Features {
            nabg: parse_env("FEATURE_NABG", self.features.nabg),
            teams: parse_env("FEATURE_TEAMS", self.features.teams),
            lfg: parse_env("FEATURE_LFG", self.features.lfg),
        };

        Ok(())
    }
}

/// Reads `key` as `T`, falling back to `default` when unset or invalid.
fn parse_env<T: FromStr + Copy + std::fmt::Debug>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using {:?}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const KEYS: &[&str] = &[
        "DISCORD_TOKEN",
        "COMMAND_PREFIX",
        "DATA_PATH",
        "LOGS_PATH",
        "INTERACTION_TIMEOUT_SECS",
        "SWEEP_INTERVAL_SECS",
        "FEATURE_NABG",
        "FEATURE_TEAMS",
        "FEATURE_LFG",
    ];

    fn clear_env() {
        for key in KEYS {
            // SAFETY: tests touching the environment are serialized.
            unsafe { std::env::remove_var(key) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::set_var(key, value) };
    }

    #[test]
    #[serial]
    fn test_load_requires_token() {
        clear_env();
        let mut config = Config::new();
        match config.load() {
            Err(AppError::MissingConfig { key }) => assert_eq!(key, "DISCORD_TOKEN"),
            other => panic!("Expected MissingConfig, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        clear_env();
        set_env("DISCORD_TOKEN", "token");
        let mut config = Config::new();
        config.load().unwrap();

        assert_eq!(config.discord_token, "token");
        assert_eq!(config.prefix, "!");
        assert_eq!(config.interaction_timeout, Duration::from_secs(60));
        assert_eq!(config.features, Features::default());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_overrides_and_bad_values() {
        clear_env();
        set_env("DISCORD_TOKEN", "token");
        set_env("COMMAND_PREFIX", "?");
        set_env("INTERACTION_TIMEOUT_SECS", "120");
        set_env("SWEEP_INTERVAL_SECS", "often");
        set_env("FEATURE_LFG", "false");
        let mut config = Config::new();
        config.load().unwrap();

        assert_eq!(config.prefix, "?");
        assert_eq!(config.interaction_timeout, Duration::from_secs(120));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert!(!config.features.lfg);
        assert!(config.features.teams);
        clear_env();
    }
}
