use std::env;

pub mod cors;

pub use cors::create_cors_layer;

use crate::utils::error::AppError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string. Required; absence is fatal at startup.
    pub mongodb_uri: String,
    /// Public base URL the server-rendered pages use to call the JSON API.
    pub public_base_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mongodb_uri = lookup("MONGODB_URI")
            .ok_or_else(|| AppError::Config("MONGODB_URI must be set".to_string()))?;

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let port = lookup("PORT")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            mongodb_uri,
            public_base_url,
            port,
        })
    }
}
