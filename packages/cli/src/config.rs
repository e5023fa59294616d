// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Required secrets, database location, port, model selection and CORS origin

use std::env;
use std::num::ParseIntError;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Shared secret expected in `x-api-key`
    pub api_key: String,
    pub google_api_key: String,
    pub port: u16,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingVar(key));

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>()?,
            None => DEFAULT_PORT,
        };
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            api_key: require("API_KEY")?,
            google_api_key: require("GOOGLE_API_KEY")?,
            port,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| kroolo_ai::DEFAULT_MODEL.to_string()),
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| kroolo_ai::DEFAULT_API_BASE.to_string()),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}
