use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::matches::transitions::TransitionGuard;

/// Hourly, on the hour (seconds-first cron syntax).
pub const DEFAULT_REQUEST_EXPIRY_CRON: &str = "0 0 * * * *";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub match_transitions: TransitionGuard,
    pub request_expiry_cron: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "roomie".to_string()),
            match_transitions: env::var("MATCH_TRANSITIONS")
                .ok()
                .map(|mode| mode.parse::<TransitionGuard>())
                .transpose()
                .context("MATCH_TRANSITIONS must be 'permissive' or 'strict'")?
                .unwrap_or_default(),
            request_expiry_cron: env::var("REQUEST_EXPIRY_CRON")
                .unwrap_or_else(|_| DEFAULT_REQUEST_EXPIRY_CRON.to_string()),
        })
    }
}
