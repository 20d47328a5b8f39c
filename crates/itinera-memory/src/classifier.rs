// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the persistence classifier service.
//!
//! The classifier is a chat-completion endpoint prompted to split a
//! message into standalone phrases, each scored for persistence. Model
//! output is untrusted: responses are often wrapped in markdown code
//! fences, and schema violations degrade to an empty phrase list rather
//! than an error. `Err` is reserved for transport failures.

use std::time::Duration;

use async_trait::async_trait;
use itinera_config::ClassifierConfig;
use itinera_core::types::ClassifiedPhrase;
use itinera_core::{AdapterType, ClassifierAdapter, HealthStatus, ItineraError, PluginAdapter};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CLASSIFY_PROMPT: &str = "You are a classifier that extracts distinct meanings from a \
user message and assigns each a persistence score from 0 to 1. A score of 1 means the meaning \
should persist across all chat sessions; 0 means it is only relevant to the current session. \
Return a valid JSON array of objects with \"phrase\" and \"persistence\" keys, inside triple \
backticks (```json ... ```), with no other text.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Persistence classifier backed by a chat-completion HTTP endpoint.
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpClassifier {
    /// Build a client from config. Fails if no endpoint is configured.
    pub fn from_config(config: &ClassifierConfig, timeout: Duration) -> Result<Self, ItineraError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| ItineraError::Config("classifier.endpoint is not set".to_string()))?;

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| ItineraError::Config("classifier.api_key is not valid".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ItineraError::Classifier {
                message: "failed to build classifier HTTP client".to_string(),
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
impl PluginAdapter for HttpClassifier {
    fn name(&self) -> &str {
        "http-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ItineraError> {
        Ok(())
    }
}

#[async_trait]
impl ClassifierAdapter for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ClassifiedPhrase>, ItineraError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "system",
                content: format!("{CLASSIFY_PROMPT}\n\nNow analyze this message: \"{text}\""),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ItineraError::Classifier {
                message: "classifier request failed".to_string(),
                source: Some(Box::new(e)),
            })?
            .error_for_status()
            .map_err(|e| ItineraError::Classifier {
                message: "classifier returned an error status".to_string(),
                source: Some(Box::new(e)),
            })?;

        let body: ChatResponse = response.json().await.map_err(|e| ItineraError::Classifier {
            message: "classifier response body was not valid JSON".to_string(),
            source: Some(Box::new(e)),
        })?;

        let Some(choice) = body.choices.first() else {
            warn!("classifier returned no choices, treating as no phrases");
            return Ok(Vec::new());
        };

        let phrases = parse_classifier_content(&choice.message.content);
        debug!(count = phrases.len(), "classifier extracted phrases");
        Ok(phrases)
    }
}

/// Parse the model's message content into scored phrases.
///
/// Strips markdown code fences, then deserializes a JSON array. Any schema
/// violation yields an empty list; entries with out-of-range scores are
/// dropped individually.
pub(crate) fn parse_classifier_content(raw: &str) -> Vec<ClassifiedPhrase> {
    let stripped = strip_code_fences(raw);
    match serde_json::from_str::<Vec<ClassifiedPhrase>>(stripped) {
        Ok(phrases) => phrases
            .into_iter()
            .filter(|p| {
                let in_range = (0.0..=1.0).contains(&p.score);
                if !in_range {
                    warn!(phrase = %p.phrase, score = p.score, "dropping out-of-range score");
                }
                in_range
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "classifier content was not a phrase array, treating as empty");
            Vec::new()
        }
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
