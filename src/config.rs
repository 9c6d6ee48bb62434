use std::env;

use anyhow::{Context, Result};
use url::Url;

use crate::db::DEFAULT_MAX_POOL_SIZE;

/// Connection settings shared by the server and the maintenance CLI.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub database_max_pool_size: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_pool_size = var("DATABASE_MAX_POOL_SIZE")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_POOL_SIZE);
        Ok(Self {
            database_url,
            database_max_pool_size,
        })
    }

    pub fn redacted_database_url(&self) -> String {
        redact_database_url(&self.database_url)
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_pool_size: u32,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_minutes: i64,
    pub cors_allowed_origin: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
    pub prediction_service_url: String,
    pub prediction_timeout_secs: u64,
    pub campaign_sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let DatabaseConfig {
            database_url,
            database_max_pool_size,
        } = DatabaseConfig::from_env()?;
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("SERVER_PORT must be a valid u16")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "jobboard".to_string());
        let jwt_audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| "jobboard-clients".to_string());
        let jwt_expiry_minutes = env::var("JWT_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "1440".to_string())
            .parse()
            .context("JWT_EXPIRY_MINUTES must be an integer")?;
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok();
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .context("SMTP_PORT must be a valid u16")?;
        let smtp_username = env::var("EMAIL").context("EMAIL must be set")?;
        let smtp_password = env::var("EMAIL_PASS").context("EMAIL_PASS must be set")?;
        let mail_from = env::var("MAIL_FROM").unwrap_or_else(|_| smtp_username.clone());
        let prediction_service_url = env::var("PREDICTION_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:5000/predict".to_string());
        let prediction_timeout_secs = env::var("PREDICTION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("PREDICTION_TIMEOUT_SECS must be an integer")?;
        let campaign_sweep_interval_secs = env::var("CAMPAIGN_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("CAMPAIGN_SWEEP_INTERVAL_SECS must be an integer")?;

        Ok(Self {
            database_url,
            database_max_pool_size,
            server_host,
            server_port,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            jwt_expiry_minutes,
            cors_allowed_origin,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            mail_from,
            prediction_service_url,
            prediction_timeout_secs,
            campaign_sweep_interval_secs,
        })
    }

    pub fn redacted_database_url(&self) -> String {
        redact_database_url(&self.database_url)
    }
}

fn redact_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("*****"));
            }
            parsed.to_string()
        }
        Err(_) => "***".to_string(),
    }
}
