use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::error::{VibeError, VibeResult};

/// Source of raw model text for a system/user prompt pair.
///
/// Implementations return the model's text verbatim; fence stripping and JSON parsing happen in
/// [`crate::pipeline::agent`].
pub trait TextGenerator: Send + Sync {
    /// Model text answering `user` under the `system` instructions.
    fn generate(&self, system: &str, user: &str) -> VibeResult<String>;
}

/// Blocking client for the Gemini `generateContent` endpoint, requesting JSON output.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Build from the text provider section of `config`. Fails when no API key is configured.
    pub fn from_config(config: &Config) -> VibeResult<Self> {
        let api_key = config.text.api_key.clone().ok_or_else(|| {
            VibeError::validation("text provider api key is not set (VIBEFRAME_TEXT_API_KEY)")
        })?;
        Ok(Self::with_client(
            config.http_client()?,
            config.text.endpoint.clone(),
            config.text.model.clone(),
            api_key,
        ))
    }

    /// Reuse an existing client, e.g. to share its connection pool.
    pub fn with_client(
        client: reqwest::blocking::Client,
        endpoint: String,
        model: String,
        api_key: String,
    ) -> Self {
        Self {
            client,
            endpoint,
            model,
            api_key,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, system: &str, user: &str) -> VibeResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: format!("SYSTEM: {system}\n\nUSER TASK: {user}"),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VibeError::provider(format!(
                "text generation failed ({status}): {body}"
            )));
        }

        let parsed: GenerateResponse = response.json()?;
        Ok(response_text(parsed))
    }
}

fn response_text(resp: GenerateResponse) -> String {
    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/provider.rs"]
mod tests;
