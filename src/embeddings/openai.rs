//! OpenAI embeddings client.
//!
//! One synchronous request per text against `{base_url}/embeddings`. No
//! retries here; callers decide what a failure means for them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EmbeddingConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::{PartDbError, Result};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbedder {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiEmbedder {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PartDbError::Config(format!("embedding http client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from config; the API key is read from the environment variable
    /// named by `api_key_env`.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PartDbError::MissingConfig(format!(
                    "{} is not set (needed by the openai embedding backend)",
                    config.api_key_env
                ))
            })?;
        Self::new(
            &config.base_url,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai"
    }

    fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|err| {
                let reason = if err.is_timeout() { "timed out" } else { "failed" };
                PartDbError::EmbeddingUnavailable(format!("embedding request {reason}: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            warn!(target: "embeddings", %status, "embedding request rejected");
            return Err(PartDbError::EmbeddingUnavailable(format!(
                "embedding API returned HTTP {status}: {snippet}"
            )));
        }

        let parsed: EmbeddingResponse = response.json().map_err(|err| {
            PartDbError::EmbeddingUnavailable(format!("embedding response parse: {err}"))
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| {
                PartDbError::EmbeddingUnavailable("embedding response had no data".to_string())
            })
    }
}
