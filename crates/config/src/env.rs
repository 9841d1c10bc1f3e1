use catena_common::error::{CatenaError, CatenaResult};
use serde::Deserialize;
use std::env;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://www.magisterium.com";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Credential for the upstream chat API. Its absence is not a startup
    /// failure: it is reported on the request path as a 400-class error.
    pub api_key: Option<String>,
    pub upstream_base_url: String,
    pub upstream_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads vars.
    pub fn from_env() -> CatenaResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_key: env::var("MAGISTERIUM_API_KEY").ok().filter(|v| !v.is_empty()),
            upstream_base_url: get_var_or("MAGISTERIUM_BASE_URL", DEFAULT_UPSTREAM_BASE_URL),
            upstream_timeout_secs: get_var_or(
                "UPSTREAM_TIMEOUT_SECS",
                &DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .map_err(|e| CatenaError::Config(format!("invalid UPSTREAM_TIMEOUT_SECS: {e}")))?,
            host: get_var_or("HOST", "0.0.0.0"),
            port: get_var_or("PORT", "3000")
                .parse()
                .map_err(|e| CatenaError::Config(format!("invalid PORT: {e}")))?,
            environment: get_var_or("APP_ENV", "development"),
            log_level: get_var_or("LOG_LEVEL", "info"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// In production, error responses carry no diagnostic detail.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
