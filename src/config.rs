use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::{
    BAN_THRESHOLD, BLOCK_REWARD, DEFAULT_DIFFICULTY, GRACE_PERIOD_SECS, MAX_DIFFICULTY,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("difficulty {0} exceeds the digest length ({} hex digits)", MAX_DIFFICULTY)]
    DifficultyTooHigh(u32),
    #[error("ban threshold must be at least 1")]
    ZeroBanThreshold,
    #[error("block reward must not be negative (got {0})")]
    NegativeReward(i64),
    #[error("max mining attempts must be at least 1")]
    ZeroMiningAttempts,
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Chain-wide parameters, fixed when the chain is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    /// Leading zero hex digits required in every block hash.
    pub difficulty: u32,
    /// Score credited for an accepted, on-time block.
    pub block_reward: i64,
    /// Longest broadcast delay that is not penalized.
    pub grace_period: Duration,
    /// Red flags at which a miner is banned.
    pub ban_threshold: u32,
    /// Cap on nonce attempts per block; `None` mines until success.
    pub max_mining_attempts: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            block_reward: BLOCK_REWARD,
            grace_period: Duration::from_secs(GRACE_PERIOD_SECS),
            ban_threshold: BAN_THRESHOLD,
            max_mining_attempts: None,
        }
    }
}

impl ChainConfig {
    /// Read overrides from the process environment. Unset keys keep their
    /// default; the result is validated before it is returned.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            difficulty: parse_or(&lookup, "DIFFICULTY", defaults.difficulty)?,
            block_reward: parse_or(&lookup, "BLOCK_REWARD", defaults.block_reward)?,
            grace_period: Duration::from_secs(parse_or(
                &lookup,
                "GRACE_PERIOD_SECS",
                defaults.grace_period.as_secs(),
            )?),
            ban_threshold: parse_or(&lookup, "BAN_THRESHOLD", defaults.ban_threshold)?,
            max_mining_attempts: match lookup("MAX_MINING_ATTEMPTS") {
                Some(raw) => Some(parse_value("MAX_MINING_ATTEMPTS", &raw)?),
                None => None,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyTooHigh(self.difficulty));
        }
        if self.ban_threshold == 0 {
            return Err(ConfigError::ZeroBanThreshold);
        }
        if self.block_reward < 0 {
            return Err(ConfigError::NegativeReward(self.block_reward));
        }
        if self.max_mining_attempts == Some(0) {
            return Err(ConfigError::ZeroMiningAttempts);
        }
        Ok(())
    }
}

/// Parse a boolean flag such as `BROADCAST_SLEEP=false`.
pub fn env_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    flag_or(&env_lookup, key, default)
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn flag_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { key, value: raw }),
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: raw.to_string(),
    })
}
