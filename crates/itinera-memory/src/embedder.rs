// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the embedding service.
//!
//! The model identity is fixed at construction time; stored phrases and
//! queries must be embedded by the same model for nearest-neighbor recall
//! to mean anything.

use std::time::Duration;

use async_trait::async_trait;
use itinera_config::EmbeddingConfig;
use itinera_core::types::{EmbeddingInput, EmbeddingOutput};
use itinera_core::{AdapterType, EmbeddingAdapter, HealthStatus, ItineraError, PluginAdapter};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    inputs: &'a [String],
    parameters: EmbedParameters<'a>,
}

#[derive(Serialize)]
struct EmbedParameters<'a> {
    input_type: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    values: Vec<f32>,
}

/// Embedding generator backed by an inference HTTP endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpEmbedder {
    /// Build a client from config. Fails if no endpoint is configured.
    pub fn from_config(config: &EmbeddingConfig, timeout: Duration) -> Result<Self, ItineraError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| ItineraError::Config("embedding.endpoint is not set".to_string()))?;

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| ItineraError::Config("embedding.api_key is not valid".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ItineraError::Embedding {
                message: "failed to build embedding HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpEmbedder {
    fn name(&self) -> &str {
        "http-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ItineraError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for HttpEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, ItineraError> {
        if input.texts.is_empty() {
            return Ok(EmbeddingOutput {
                embeddings: Vec::new(),
                dimensions: 0,
            });
        }

        let request = EmbedRequest {
            model: &self.model,
            inputs: &input.texts,
            parameters: EmbedParameters {
                input_type: input.kind.as_str(),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ItineraError::Embedding {
                message: "embedding request failed".to_string(),
                source: Some(Box::new(e)),
            })?
            .error_for_status()
            .map_err(|e| ItineraError::Embedding {
                message: "embedding service returned an error status".to_string(),
                source: Some(Box::new(e)),
            })?;

        let body: EmbedResponse = response.json().await.map_err(|e| ItineraError::Embedding {
            message: "embedding response body was not valid JSON".to_string(),
            source: Some(Box::new(e)),
        })?;

        if body.data.len() != input.texts.len() {
            return Err(ItineraError::Embedding {
                message: format!(
                    "embedding count mismatch: sent {} texts, got {} vectors",
                    input.texts.len(),
                    body.data.len()
                ),
                source: None,
            });
        }

        let dimensions = body.data.first().map(|d| d.values.len()).unwrap_or(0);
        debug!(
            count = body.data.len(),
            dimensions, "embedding batch complete"
        );

        Ok(EmbeddingOutput {
            embeddings: body.data.into_iter().map(|d| d.values).collect(),
            dimensions,
        })
    }
}
