use roster_common::error::{RosterError, RosterResult};
use roster_matching::MatchingConfig;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub log_level: String,
    pub matching: MatchingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present; every variable is optional.
    pub fn from_env() -> RosterResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        let mut matching = MatchingConfig::default();
        if let Some(threshold) = parse_var("DEDUP_THRESHOLD")? {
            matching.threshold = threshold;
        }
        if let Some(min_defined) = parse_var("DEDUP_MIN_DEFINED_SUBSCORES")? {
            matching.min_defined_subscores = min_defined;
        }
        if let Some(weight) = parse_var("DEDUP_WEIGHT_NAME")? {
            matching.weights.name = weight;
        }
        if let Some(weight) = parse_var("DEDUP_WEIGHT_EMAIL")? {
            matching.weights.email = weight;
        }
        if let Some(weight) = parse_var("DEDUP_WEIGHT_PHONE")? {
            matching.weights.phone = weight;
        }
        if let Some(weight) = parse_var("DEDUP_WEIGHT_ADDRESS")? {
            matching.weights.address = weight;
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            log_level: get_var_or("LOG_LEVEL", "info"),
            matching,
        })
    }

    pub fn require_database_url(&self) -> RosterResult<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| RosterError::Config("DATABASE_URL is required but not set".to_owned()))
    }
}

fn parse_var<T>(key: &str) -> RosterResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| RosterError::Config(format!("invalid {key}: {e}"))),
        _ => Ok(None),
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
