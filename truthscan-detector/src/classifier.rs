//! Client for the external classification API.
//!
//! The API is an OpenAI-compatible chat completions endpoint asked to answer
//! with a JSON object shaped like [`AnalysisResult`]. Whatever comes back goes
//! through [`validate_classification`] before it is trusted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::types::{AnalysisDetails, AnalysisResult, Credibility, Status};

/// Errors from a classification attempt. None of these reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Classification timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error: HTTP {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Empty content in classification response")]
    EmptyContent,

    #[error("Malformed classification: {0}")]
    Malformed(String),
}

/// Something that can turn article text into a verdict.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Classify `text`, authenticating with `api_key`.
    async fn classify(&self, text: &str, api_key: &str) -> Result<AnalysisResult, ClassifierError>;
}

const SYSTEM_PROMPT: &str =
    "You are an expert fact-checker and journalist who specializes in detecting fake news.";

/// Build the user prompt for one article.
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following news article for credibility and determine if it might be fake news.

Article: "{text}"

Provide a detailed analysis with the following:
1. Suspicion score (0-100, where 0 is definitely credible and 100 is definitely fake)
2. Credibility level: "high" for scores below 30, "medium" below 60, "low" otherwise
3. Status paired with the credibility level: "likely-real", "questionable" or "likely-fake"
4. List of suspicious elements or red flags (if any)
5. List of credibility indicators (if any)
6. Word count

Format your response as a JSON object with the following structure:
{{
  "score": number,
  "credibility": "low" | "medium" | "high",
  "status": "likely-fake" | "questionable" | "likely-real",
  "fakeKeywordsFound": number,
  "reliableIndicatorsFound": number,
  "analysis": {{
    "textLength": number,
    "suspiciousKeywords": string[],
    "reliableIndicators": string[]
  }}
}}

Only respond with the JSON object, no other text."#
    )
}

// ============================================================================
// Structural validation
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireClassification {
    score: f64,
    credibility: Credibility,
    status: Status,
    fake_keywords_found: f64,
    reliable_indicators_found: f64,
    analysis: WireAnalysis,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnalysis {
    text_length: f64,
    suspicious_keywords: Vec<String>,
    reliable_indicators: Vec<String>,
}

/// Accept a JSON number as a count only if it is a non-negative whole number.
fn whole_count(field: &str, value: f64) -> Result<u32, ClassifierError> {
    let whole = value.is_finite() && value.fract() == 0.0;
    if whole && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ClassifierError::Malformed(format!(
            "{field} {value} is not a whole count"
        )))
    }
}

/// Strip a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse and check a classification payload.
///
/// Every field must be present with the right type, the enum labels must be
/// known, `score` must lie in [0, 100], and credibility must pair with status.
/// The score is rounded to the nearest integer.
pub fn validate_classification(content: &str) -> Result<AnalysisResult, ClassifierError> {
    let json = strip_code_fence(content);
    if json.is_empty() {
        return Err(ClassifierError::EmptyContent);
    }

    let wire: WireClassification =
        serde_json::from_str(json).map_err(|e| ClassifierError::Malformed(e.to_string()))?;

    if !wire.score.is_finite() || !(0.0..=100.0).contains(&wire.score) {
        return Err(ClassifierError::Malformed(format!(
            "score {} outside [0, 100]",
            wire.score
        )));
    }

    if wire.credibility.status() != wire.status {
        return Err(ClassifierError::Malformed(format!(
            "credibility {:?} does not pair with status {:?}",
            wire.credibility, wire.status
        )));
    }

    Ok(AnalysisResult {
        score: wire.score.round() as u8,
        credibility: wire.credibility,
        status: wire.status,
        fake_keywords_found: whole_count("fakeKeywordsFound", wire.fake_keywords_found)?,
        reliable_indicators_found: whole_count(
            "reliableIndicatorsFound",
            wire.reliable_indicators_found,
        )?,
        analysis: AnalysisDetails {
            text_length: whole_count("textLength", wire.analysis.text_length)? as usize,
            suspicious_keywords: wire.analysis.suspicious_keywords,
            reliable_indicators: wire.analysis.reliable_indicators,
        },
    })
}

// ============================================================================
// OpenAI implementation
// ============================================================================

/// Classifier backed by an OpenAI-compatible chat completions API.
pub struct OpenAiClassifier {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiClassifier {
    /// Create a classifier for `base_url` (e.g. `https://api.openai.com`).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Model used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    fn name(&self) -> &str {
        "openai"
    }

    async fn classify(&self, text: &str, api_key: &str) -> Result<AnalysisResult, ClassifierError> {
        let start = Instant::now();

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(text),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout(start.elapsed())
                } else {
                    ClassifierError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                body: truthscan_common::util::truncate_with_ellipsis(&body, 200),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(format!("invalid response envelope: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ClassifierError::EmptyContent)?;

        debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            content_chars = content.chars().count(),
            "Classification response received"
        );

        validate_classification(&content)
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
