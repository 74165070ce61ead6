use retail_insights_api::config::{AnalyticsConfig, DatabaseSettings};
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub app_env: String,
    pub database: DatabaseSettings,
    pub analytics: AnalyticsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.analytics = AnalyticsConfig::from_env();
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT: {}", v)))?,
            None => DEFAULT_PORT,
        };

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidValue(format!("DB_MAX_CONNECTIONS: {}", v))),
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let app_env = var("APP_ENV").unwrap_or_else(|| "production".to_string());

        Ok(Config {
            port,
            database: DatabaseSettings {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections,
                sql_logging: app_env == "development",
            },
            app_env,
            analytics: AnalyticsConfig::default(),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
