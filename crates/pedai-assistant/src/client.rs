// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Lisa responder service.
//!
//! The gateway does not run any AI itself; it forwards the conversation
//! context to an external responder over HTTP and relays the reply text.

use std::time::Duration;

use async_trait::async_trait;
use pedai_config::model::AssistantConfig;
use pedai_core::{AssistantContext, AssistantResponder, PedaiError};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RespondResponse {
    reply: String,
}

/// Client for the Lisa responder service, implementing [`AssistantResponder`].
#[derive(Debug, Clone)]
pub struct LisaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LisaClient {
    pub fn new(config: &AssistantConfig) -> Result<Self, PedaiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PedaiError::Assistant {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl AssistantResponder for LisaClient {
    async fn respond(&self, ctx: &AssistantContext) -> Result<String, PedaiError> {
        let url = format!("{}/v1/respond", self.base_url);

        let mut request = self.client.post(&url).json(ctx);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| PedaiError::Assistant {
            message: format!("responder unreachable: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PedaiError::Assistant {
                message: format!("responder returned {status}: {body}"),
                source: None,
            });
        }

        let body: RespondResponse =
            response.json().await.map_err(|e| PedaiError::Assistant {
                message: format!("malformed responder reply: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(store_id = %ctx.store_id, reply_len = body.reply.len(), "assistant replied");
        Ok(body.reply)
    }
}
