use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::Email;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub access_token_secret: String,
    pub token_ttl_hours: i64,
    /// The single platform account that collects commission income.
    pub admin_email: Email,
    pub cors_origins: Vec<String>,
    pub payment_api_url: String,
    pub payment_secret_key: String,
    pub payment_currency: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

const MIN_TOKEN_TTL_HOURS: i64 = 1;
const MAX_TOKEN_TTL_HOURS: i64 = 10;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = required(&env_map, "DATABASE_PATH")?;
        let access_token_secret = required(&env_map, "ACCESS_TOKEN_SECRET")?;
        if access_token_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "ACCESS_TOKEN_SECRET".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let token_ttl_hours = env_map
            .get("TOKEN_TTL_HOURS")
            .map(|s| s.as_str())
            .unwrap_or("1")
            .parse::<i64>()
            .ok()
            .filter(|h| (MIN_TOKEN_TTL_HOURS..=MAX_TOKEN_TTL_HOURS).contains(h))
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "TOKEN_TTL_HOURS".to_string(),
                    format!(
                        "must be an integer between {} and {}",
                        MIN_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS
                    ),
                )
            })?;

        let admin_email = Email::from_str(&required(&env_map, "ADMIN_EMAIL")?).map_err(|e| {
            ConfigError::InvalidValue("ADMIN_EMAIL".to_string(), e.to_string())
        })?;

        let cors_origins = parse_cors_origins_from_map(&env_map);

        let payment_api_url = env_map
            .get("PAYMENT_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://api.stripe.com".to_string())
            .trim_end_matches('/')
            .to_string();
        let payment_secret_key = required(&env_map, "PAYMENT_SECRET_KEY")?;
        let payment_currency = env_map
            .get("PAYMENT_CURRENCY")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| "usd".to_string());

        Ok(Config {
            port,
            database_path,
            access_token_secret,
            token_ttl_hours,
            admin_email,
            cors_origins,
            payment_api_url,
            payment_secret_key,
            payment_currency,
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_cors_origins_from_map(env_map: &HashMap<String, String>) -> Vec<String> {
    match env_map.get("CORS_ORIGINS") {
        Some(origins) => origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => vec!["http://localhost:5173".to_string()],
    }
}
