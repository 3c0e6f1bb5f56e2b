//! # Together SDK
//!
//! A Rust client for the Together AI inference API.
//!
//! ## Features
//!
//! - Async-first design on `tokio` and `reqwest`
//! - Text completions, chat completions, embeddings and fine-tuned instance control
//! - Automatic retries with bounded exponential backoff
//! - Caller-driven cancellation and deadlines through [`Context`]
//! - Debug dumps of every exchange with the API key redacted
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use together_sdk::{Client, CompletionsRequest, Context};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), together_sdk::Error> {
//!     let client = Client::builder()
//!         .api_key("your-api-key")
//!         .max_retries(3)
//!         .build()?;
//!
//!     let ctx = Context::background().with_timeout(std::time::Duration::from_secs(30));
//!     let response = client
//!         .completions(
//!             Some(&ctx),
//!             "mistralai/Mixtral-8x7B-v0.1",
//!             "Once upon a time",
//!             64,
//!             CompletionsRequest::default().temperature(0.7),
//!         )
//!         .await?;
//!
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. Branch on [`Error::kind`]:
//!
//! ```rust,no_run
//! use together_sdk::{ChatCompletionsRequest, Client, Context, ErrorKind};
//!
//! # async fn run(client: Client) {
//! let ctx = Context::background();
//! match client
//!     .chat_completions(Some(&ctx), "model", Vec::new(), ChatCompletionsRequest::default())
//!     .await
//! {
//!     Err(e) if e.kind() == ErrorKind::Validation => eprintln!("bad input: {e}"),
//!     Err(e) => eprintln!("call failed: {e}"),
//!     Ok(response) => println!("{}", response.content()),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod chat;
mod client;
mod completions;
mod config;
pub mod dump;
mod embeddings;
mod error;
pub mod headers;
mod instances;
mod pipeline;
mod types;

pub use chat::{
    ChatChoice, ChatCompletionsRequest, ChatCompletionsResponse, FunctionCall,
    FunctionDefinition, Message, MessageRole, NamedFunction, ResponseFormat, Tool, ToolCall,
    ToolChoice,
};
pub use client::{Client, ClientBuilder};
pub use completions::{CompletionChoice, CompletionsRequest, CompletionsResponse, MAX_TOKENS_LIMIT};
pub use config::ClientConfig;
pub use embeddings::{Embedding, EmbeddingsRequest, EmbeddingsResponse};
pub use error::{Error, ErrorKind, Result};
pub use instances::{FineTuningArgs, FineTuningChoice, FineTuningOutput, FineTuningResponse};
pub use pipeline::RawResponse;
pub use types::Usage;

// Transport types callers need to drive and inspect calls
pub use reqwest::header::HeaderMap;
pub use reqwest::Method;
pub use together_resilience::{Context, RetryConfig, TransportError};
