use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use url::Url;

use crate::error::ConfigError;
use crate::utils;

pub const DEFAULT_YELP_BASE_URL: &str = "https://api.yelp.com/v3/";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9999";

/// Runtime settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Missing keys are reported per request, not at startup.
    pub yelp_api_key: Option<String>,
    pub yelp_base_url: Url,
    pub bind_addr: String,
    pub log_dir: PathBuf,
    pub log_level: LevelFilter,
    /// Upper bound on concurrent detail lookups. `1` keeps them sequential.
    pub detail_concurrency: usize,
    pub rate_limit_replenish_secs: u64,
    pub rate_limit_burst: u32,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        let yelp_api_key = lookup("YELP_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let raw_base_url = or_default("YELP_BASE_URL", DEFAULT_YELP_BASE_URL);
        let yelp_base_url =
            utils::normalize_base_url(&raw_base_url).map_err(|e| ConfigError::Invalid {
                var: "YELP_BASE_URL".to_string(),
                reason: e.to_string(),
            })?;

        let log_level = parse_var::<LevelFilter>("LOG_LEVEL", &or_default("LOG_LEVEL", "debug"))?;

        let detail_concurrency =
            parse_var::<usize>("DETAIL_CONCURRENCY", &or_default("DETAIL_CONCURRENCY", "1"))?;
        if detail_concurrency == 0 {
            return Err(ConfigError::Invalid {
                var: "DETAIL_CONCURRENCY".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            yelp_api_key,
            yelp_base_url,
            bind_addr: or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            log_dir: PathBuf::from(or_default("LOG_DIR", "logs")),
            log_level,
            detail_concurrency,
            rate_limit_replenish_secs: parse_var(
                "RATE_LIMIT_REPLENISH_SECS",
                &or_default("RATE_LIMIT_REPLENISH_SECS", "5"),
            )?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", &or_default("RATE_LIMIT_BURST", "10"))?,
        })
    }
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var: var.to_string(),
        reason: e.to_string(),
    })
}
