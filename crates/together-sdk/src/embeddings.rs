//! Embeddings (`POST /embeddings`).

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::Usage;
use serde::{Deserialize, Serialize};
use together_resilience::Context;
use tracing::instrument;

const EMBEDDINGS_PATH: &str = "/embeddings";

/// Request body for an embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsRequest {
    /// Embedding model to use.
    pub model: String,
    /// Text to embed.
    pub input: String,
}

impl EmbeddingsRequest {
    /// Create a request with the required fields set.
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self::default().merge_required(model, input)
    }

    /// Overwrite the required fields; explicit arguments always win.
    #[must_use]
    pub fn merge_required(mut self, model: impl Into<String>, input: impl Into<String>) -> Self {
        self.model = model.into();
        self.input = input.into();
        self
    }
}

/// Response from an embedding request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsResponse {
    /// Object type.
    pub object: String,
    /// One vector per input.
    pub data: Vec<Embedding>,
    /// Model used.
    pub model: String,
    /// Token usage statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl EmbeddingsResponse {
    /// Vector of the first input, or an empty slice.
    pub fn first_embedding(&self) -> &[f32] {
        self.data
            .first()
            .map(|e| e.embedding.as_slice())
            .unwrap_or_default()
    }
}

/// A single embedding vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embedding {
    /// Object type.
    pub object: String,
    /// The vector.
    pub embedding: Vec<f32>,
    /// Position of the input this vector belongs to.
    pub index: u32,
}

impl Embedding {
    /// Number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

impl Client {
    /// Embed `input` with `model`.
    ///
    /// Arguments are checked in this order, first failure wins: `ctx`,
    /// `model`, `input`. Nothing is sent if a check fails.
    #[instrument(skip_all, fields(model = %model))]
    pub async fn embeddings(
        &self,
        ctx: Option<&Context>,
        model: &str,
        input: &str,
        options: EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse> {
        let ctx = ctx.ok_or_else(Error::no_context)?;
        if model.is_empty() {
            return Err(Error::missing("model"));
        }
        if input.is_empty() {
            return Err(Error::missing("input"));
        }

        let request = options.merge_required(model, input);
        self.post_json(ctx, EMBEDDINGS_PATH, &request).await
    }
}
