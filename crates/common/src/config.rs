//! Application configuration.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Deserializer};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Voting schedule configuration.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Voting schedule configuration.
///
/// Times are wall-clock times in [`ScheduleConfig::timezone`].
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Time of day at which the weekly winner is selected (default 11:50).
    #[serde(default = "default_winner_time", deserialize_with = "deserialize_time")]
    pub winner_time: NaiveTime,
    /// Days on which the selector runs (default Monday to Friday).
    #[serde(default = "default_business_days")]
    pub business_days: Vec<Weekday>,
    /// Today's leader is visible strictly before this time (default 12:00).
    #[serde(default = "default_disclosure_cutoff", deserialize_with = "deserialize_time")]
    pub disclosure_cutoff: NaiveTime,
    /// IANA timezone name used for all local date and time arithmetic.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Pause after a failed selection run, in seconds (default one hour).
    #[serde(default = "default_failure_backoff_secs")]
    pub failure_backoff_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            winner_time: default_winner_time(),
            business_days: default_business_days(),
            disclosure_cutoff: default_disclosure_cutoff(),
            timezone: default_timezone(),
            failure_backoff_secs: default_failure_backoff_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_winner_time() -> NaiveTime {
    NaiveTime::from_hms_opt(11, 50, 0).unwrap_or(NaiveTime::MIN)
}

fn default_disclosure_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_business_days() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
}

fn default_timezone() -> String {
    "UTC".to_string()
}

const fn default_failure_backoff_secs() -> u64 {
    3600
}

/// Accepts `HH:MM` as well as `HH:MM:SS`.
fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).map_err(serde::de::Error::custom)
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| format!("invalid time of day '{raw}': {e}"))
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `TEAMLUNCH_ENV`)
    /// 3. Environment variables with `TEAMLUNCH_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("TEAMLUNCH_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TEAMLUNCH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("schedule.business_days")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
