//! Fine-tuned model instances (`/instances`).

use crate::client::Client;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use together_resilience::Context;
use tracing::instrument;

const INSTANCES_PATH: &str = "/instances";

/// State of a fine-tuned instance as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningResponse {
    /// Instance status.
    pub status: String,
    /// Prompts the instance was run with.
    pub prompt: Vec<String>,
    /// Model name.
    pub model: String,
    /// Owner of the model.
    pub model_owner: String,
    /// Free-form tags; the service does not document their shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<serde_json::Value>,
    /// Number of returned sequences.
    pub num_returns: u32,
    /// Arguments the instance was invoked with.
    pub args: FineTuningArgs,
    /// Sub-jobs; the service does not document their shape.
    pub subjobs: Vec<serde_json::Value>,
    /// Generated output.
    pub output: FineTuningOutput,
}

impl FineTuningResponse {
    /// Text of the first output choice, or `""`.
    pub fn text(&self) -> &str {
        self.output.choices.first().map_or("", |c| c.text.as_str())
    }
}

/// Invocation arguments echoed in a [`FineTuningResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningArgs {
    /// Model name.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Top-p sampling parameter.
    pub top_p: f64,
    /// Top-k sampling parameter.
    pub top_k: u32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Output section of a [`FineTuningResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningOutput {
    /// Generated choices.
    pub choices: Vec<FineTuningChoice>,
    /// Compute time in seconds.
    pub raw_compute_time: f64,
    /// Kind of result.
    pub result_type: String,
}

/// A single generated choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuningChoice {
    /// Why generation stopped.
    pub finish_reason: String,
    /// Index of this choice.
    pub index: u32,
    /// Generated text.
    pub text: String,
}

/// Path for an instance action with `name` query-escaped.
fn action_path(action: &str, name: &str) -> String {
    let escaped: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{INSTANCES_PATH}/{action}?model={escaped}")
}

impl Client {
    /// List running fine-tuned instances.
    #[instrument(skip_all)]
    pub async fn list_running_instances(
        &self,
        ctx: Option<&Context>,
    ) -> Result<FineTuningResponse> {
        let ctx = ctx.ok_or_else(Error::no_context)?;
        self.call_json(ctx, Method::GET, INSTANCES_PATH).await
    }

    /// Start the fine-tuned model called `name`.
    ///
    /// Arguments are checked in this order: `ctx`, `name`.
    #[instrument(skip_all, fields(name = %name))]
    pub async fn start_fine_tuned_instance(
        &self,
        ctx: Option<&Context>,
        name: &str,
    ) -> Result<FineTuningResponse> {
        self.instance_action(ctx, "start", name).await
    }

    /// Stop the fine-tuned model called `name`.
    ///
    /// Arguments are checked in this order: `ctx`, `name`.
    #[instrument(skip_all, fields(name = %name))]
    pub async fn stop_fine_tuned_instance(
        &self,
        ctx: Option<&Context>,
        name: &str,
    ) -> Result<FineTuningResponse> {
        self.instance_action(ctx, "stop", name).await
    }

    async fn instance_action(
        &self,
        ctx: Option<&Context>,
        action: &str,
        name: &str,
    ) -> Result<FineTuningResponse> {
        let ctx = ctx.ok_or_else(Error::no_context)?;
        if name.is_empty() {
            return Err(Error::missing("name"));
        }
        self.call_json(ctx, Method::POST, &action_path(action, name))
            .await
    }
}
