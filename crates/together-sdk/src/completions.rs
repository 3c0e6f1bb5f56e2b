//! Text completions (`POST /v1/completions`).

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::Usage;
use serde::{Deserialize, Serialize};
use together_resilience::Context;
use tracing::instrument;

const COMPLETIONS_PATH: &str = "/v1/completions";

/// Largest accepted `max_tokens`.
pub const MAX_TOKENS_LIMIT: u32 = i32::MAX as u32;

/// Request body for a text completion.
///
/// Passed to [`Client::completions`] as the options object: `model`,
/// `prompt` and `max_tokens` are always overwritten by the explicit
/// arguments, every other field is sent only when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionsRequest {
    /// Model to use for completion.
    pub model: String,
    /// Prompt to complete.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Ask for a streamed response. Accepted but not specially handled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p sampling parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Repetition penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    /// Number of top log probabilities to return per token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<u32>,
    /// Echo the prompt in the output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,
    /// Number of completions to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// Moderation model to run over the output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_model: Option<String>,
}

impl CompletionsRequest {
    /// Create a request with the required fields set.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self::default().merge_required(model, prompt, max_tokens)
    }

    /// Overwrite the required fields; explicit arguments always win over
    /// whatever the options carried.
    #[must_use]
    pub fn merge_required(
        mut self,
        model: impl Into<String>,
        prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        self.model = model.into();
        self.prompt = prompt.into();
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the top-p sampling parameter.
    #[must_use]
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the top-k sampling parameter.
    #[must_use]
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set the repetition penalty.
    #[must_use]
    pub fn repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }

    /// Add a stop sequence.
    #[must_use]
    pub fn add_stop(mut self, sequence: impl Into<String>) -> Self {
        self.stop.get_or_insert_with(Vec::new).push(sequence.into());
        self
    }

    /// Set the moderation model.
    #[must_use]
    pub fn safety_model(mut self, model: impl Into<String>) -> Self {
        self.safety_model = Some(model.into());
        self
    }
}

/// Response from a text completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionsResponse {
    /// Unique identifier for this completion.
    pub id: String,
    /// Generated choices.
    pub choices: Vec<CompletionChoice>,
    /// Token usage statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Unix timestamp of creation.
    pub created: i64,
    /// Model used.
    pub model: String,
    /// Object type.
    pub object: String,
}

impl CompletionsResponse {
    /// Text of the first choice, or `""`.
    pub fn text(&self) -> &str {
        self.choices.first().map_or("", |c| c.text.as_str())
    }

    /// Total tokens, if the service reported usage.
    pub fn total_tokens(&self) -> Option<u32> {
        self.usage.map(|u| u.total_tokens)
    }
}

/// A single completion choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionChoice {
    /// Generated text.
    pub text: String,
    /// Index of this choice.
    pub index: u32,
    /// Why generation stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Client {
    /// Complete `prompt` with `model`.
    ///
    /// Arguments are checked in this order, first failure wins: `ctx`,
    /// `model`, `prompt`, `max_tokens` (must be in `1..=MAX_TOKENS_LIMIT`).
    /// Nothing is sent if a check fails.
    #[instrument(skip_all, fields(model = %model, max_tokens = max_tokens))]
    pub async fn completions(
        &self,
        ctx: Option<&Context>,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        options: CompletionsRequest,
    ) -> Result<CompletionsResponse> {
        let ctx = ctx.ok_or_else(Error::no_context)?;
        if model.is_empty() {
            return Err(Error::missing("model"));
        }
        if prompt.is_empty() {
            return Err(Error::missing("prompt"));
        }
        if max_tokens == 0 || max_tokens > MAX_TOKENS_LIMIT {
            return Err(Error::validation(
                "max_tokens",
                format!("max_tokens must be greater than 0 and at most {MAX_TOKENS_LIMIT}"),
            ));
        }

        let request = options.merge_required(model, prompt, max_tokens);
        self.post_json(ctx, COMPLETIONS_PATH, &request).await
    }
}
