//! Webhook client backed by reqwest
//!
//! Posts trigger data as JSON. Every request is bounded by the configured
//! timeout.

use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{BridgeError, WebhookClient, WebhookResponse};
use crate::workflow::WebhookConfig;

#[derive(Debug, Clone)]
pub struct ReqwestWebhookClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestWebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BridgeError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl WebhookClient for ReqwestWebhookClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<WebhookResponse, BridgeError> {
        let start = Instant::now();
        debug!("Executing POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Webhook request failed: {}", e);
                if e.is_timeout() {
                    BridgeError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    BridgeError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!("POST {} -> {} ({}ms)", url, status, elapsed_ms);

        Ok(WebhookResponse {
            status,
            body,
            elapsed_ms,
        })
    }
}
