use dotenvy::dotenv;
use std::env;

use crate::error::AppError;

/// Runtime configuration, read once at startup. Missing required variables
/// are a hard startup failure.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// LIFF application identifier, handed to the webview at init.
    pub liff_id: String,
    /// LINE Login channel id, the expected audience of LIFF ID tokens.
    pub line_channel_id: String,
    pub app_env: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        Ok(Config {
            database_url: require("DATABASE_URL")?,
            liff_id: require("LIFF_ID")?,
            line_channel_id: require("LINE_CHANNEL_ID")?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }

    /// The placeholder identity of the bootstrap component is only allowed
    /// outside production.
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn require(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Config(format!("{name} not set")))
}
