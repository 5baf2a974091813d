//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub whisper_model: String,
    pub analysis_model: String,
    pub image_model: String,
    /// Origins allowed by CORS. A single `*` allows any origin.
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    /// Per-client AI calls allowed in one minute.
    pub ai_rate_limit_per_minute: u32,
    pub track_api_costs: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address = parse_var("BIND_ADDRESS", "0.0.0.0:5000")?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", "5")?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Keys (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        // --- Load Adapter-specific Settings ---
        let whisper_model =
            std::env::var("WHISPER_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        let analysis_model =
            std::env::var("ANALYSIS_MODEL").unwrap_or_else(|_| "gpt-4-turbo-preview".to_string());
        let image_model = std::env::var("IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string());

        // --- Load HTTP Surface Settings ---
        let allowed_origins = parse_origins(
            &std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );
        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", "16777216")?;
        let ai_rate_limit_per_minute = parse_var("AI_RATE_LIMIT_PER_MINUTE", "20")?;
        let track_api_costs = parse_var("TRACK_API_COSTS", "true")?;

        Ok(Self {
            bind_address,
            database_url,
            db_max_connections,
            log_level,
            openai_api_key,
            whisper_model,
            analysis_model,
            image_model,
            allowed_origins,
            max_upload_bytes,
            ai_rate_limit_per_minute,
            track_api_costs,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins("https://dreamweave.app, https://www.dreamweave.app,"),
            vec!["https://dreamweave.app", "https://www.dreamweave.app"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }

    #[test]
    fn unparsable_values_name_the_variable() {
        let err = parse_var::<u32>("DREAM_TEST_UNSET_VARIABLE", "not-a-number").unwrap_err();
        match err {
            ConfigError::InvalidValue(name, _) => assert_eq!(name, "DREAM_TEST_UNSET_VARIABLE"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
