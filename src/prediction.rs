use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::metrics::DropoutFeatures;

/// External model that scores an employee's dropout likelihood.
#[async_trait]
pub trait DropoutPredictor: Send + Sync {
    /// Returns the service's JSON reply verbatim.
    async fn predict(&self, features: &DropoutFeatures) -> Result<Value>;
}

pub struct HttpPredictor {
    client: Client,
    endpoint: String,
}

impl HttpPredictor {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.prediction_timeout_secs))
            .build()
            .context("failed to build prediction HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.prediction_service_url.clone(),
        })
    }
}

#[async_trait]
impl DropoutPredictor for HttpPredictor {
    async fn predict(&self, features: &DropoutFeatures) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(features)
            .send()
            .await
            .with_context(|| format!("prediction service {} unreachable", self.endpoint))?
            .error_for_status()
            .context("prediction service returned an error status")?;

        response
            .json::<Value>()
            .await
            .context("prediction service returned invalid JSON")
    }
}
