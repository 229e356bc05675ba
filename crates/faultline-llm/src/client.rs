//! Gemini HTTP client: tries each configured model in priority order,
//! rotating through the key pool and backing off on rate limits within a
//! model before giving up on it and moving to the next.

use std::time::Duration;

use faultline_core::config::LlmConfig;
use faultline_core::error::{FaultlineError, Result};
use faultline_core::types::FixProposal;
use serde::{Deserialize, Serialize};

use crate::key_pool::KeyPool;
use crate::normalize::normalize;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ATTEMPTS_PER_MODEL: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_millis(500);
const BACKOFF_CAP: Duration = Duration::from_secs(8);

const CORRECTIVE_SUFFIX: &str = "\n\nYour previous response could not be parsed as the required JSON object. Respond again with only the JSON object, no prose and no code fence.";

pub struct GeminiClient {
    http: reqwest::Client,
    models: Vec<String>,
    keys: KeyPool,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client configuration is static and always valid"),
            models: config.models.clone(),
            keys: KeyPool::new(config.keys.clone()),
        }
    }

    /// Renders a single completion for `prompt`, falling through the model
    /// priority list on quota exhaustion, model-not-found, and 5xx upstream
    /// errors. Returns [`FaultlineError::UpstreamExhausted`] if no configured
    /// model produced a response, or no configured key if the pool was
    /// empty to begin with.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        if self.keys.is_empty() {
            return Err(FaultlineError::UpstreamExhausted);
        }
        if self.models.is_empty() {
            return Err(FaultlineError::UpstreamExhausted);
        }

        let mut last_failed_model = None;
        for model in &self.models {
            match self.call_model(model, prompt).await {
                Ok(text) => return Ok(text),
                Err(FaultlineError::UpstreamRateLimited { model }) => {
                    last_failed_model = Some(model);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        tracing::warn!(?last_failed_model, "every configured model was exhausted");
        Err(FaultlineError::UpstreamExhausted)
    }

    /// Generates a completion and normalizes it into a [`FixProposal`],
    /// retrying once with a corrective follow-up prompt if the first
    /// response didn't parse.
    pub async fn generate_fix_proposal(&self, prompt: &str) -> Result<FixProposal> {
        let first = self.generate(prompt).await?;
        match normalize(&first) {
            Ok(proposal) => Ok(proposal),
            Err(_) => {
                let corrective = format!("{prompt}{CORRECTIVE_SUFFIX}");
                let second = self.generate(&corrective).await?;
                normalize(&second)
            }
        }
    }

    async fn call_model(&self, model: &str, prompt: &str) -> Result<String> {
        let mut attempt = 0;
        let mut delay = BACKOFF_BASE;

        loop {
            // All keys quarantined for this model: advance to the next model
            // rather than treating the whole request as exhausted.
            let Some((key_index, api_key)) = self.keys.use_key() else {
                return Err(FaultlineError::UpstreamRateLimited { model: model.to_string() });
            };

            let url = format!("{API_BASE}/{model}:generateContent?key={api_key}");
            let body = GenerateContentRequest {
                contents: vec![Content {
                    parts: vec![Part { text: prompt.to_string() }],
                }],
            };

            let response = self.http.post(&url).json(&body).send().await;
            attempt += 1;

            match response {
                Ok(resp) if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    self.keys.quarantine_key(key_index);
                    if attempt >= MAX_ATTEMPTS_PER_MODEL {
                        return Err(FaultlineError::UpstreamRateLimited { model: model.to_string() });
                    }
                }
                // 401/403: the key itself is bad (revoked, wrong project, no
                // quota). Quarantine it like a rate limit and keep rotating.
                Ok(resp)
                    if resp.status() == reqwest::StatusCode::UNAUTHORIZED
                        || resp.status() == reqwest::StatusCode::FORBIDDEN =>
                {
                    self.keys.quarantine_key(key_index);
                    if attempt >= MAX_ATTEMPTS_PER_MODEL {
                        return Err(FaultlineError::UpstreamRateLimited { model: model.to_string() });
                    }
                }
                Ok(resp) if resp.status().is_success() => {
                    let parsed: GenerateContentResponse = resp
                        .json()
                        .await
                        .map_err(|e| FaultlineError::ModelOutputInvalid(e.to_string()))?;
                    return extract_text(parsed)
                        .ok_or_else(|| FaultlineError::ModelOutputInvalid("empty candidate list".to_string()));
                }
                // 404 (model not found) and 5xx (transient upstream fault)
                // are the other two model-fallthrough triggers; the key is
                // not at fault, so it stays available.
                Ok(resp) if resp.status() == reqwest::StatusCode::NOT_FOUND || resp.status().is_server_error() => {
                    if attempt >= MAX_ATTEMPTS_PER_MODEL {
                        return Err(FaultlineError::UpstreamRateLimited { model: model.to_string() });
                    }
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    return Err(FaultlineError::ModelOutputInvalid(format!(
                        "upstream returned {status}: {body}"
                    )));
                }
                Err(e) if attempt >= MAX_ATTEMPTS_PER_MODEL => {
                    return Err(FaultlineError::ModelOutputInvalid(e.to_string()));
                }
                Err(_) => {}
            }

            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(BACKOFF_CAP);
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

fn extract_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .reduce(|a, b| a + &b)
}
