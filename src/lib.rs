//! # ai-lib-responses
//!
//! Background-job client for the OpenAI Responses API: submit a strict-schema request,
//! poll it to completion, decode the structured output and report how the run went.
//!
//! ## Overview
//!
//! Every job is submitted with `background: true` and `store: true`, so the submission
//! returns immediately and the job can always be fetched by id. The client then polls at a
//! fixed interval until the job is terminal or a local deadline passes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_lib_responses::{GenerationOptions, Prompt, ResponsesClient};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Answer {
//!     response: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> ai_lib_responses::Result<()> {
//!     let client = ResponsesClient::new()?; // OPENAI_API_KEY from the environment
//!
//!     let schema = json!({"response": {"type": "string"}});
//!     let generation = client
//!         .generate_structured::<Answer>(
//!             &Prompt::new("Say hello."),
//!             schema.as_object().cloned().unwrap_or_default(),
//!             &GenerationOptions::default(),
//!         )
//!         .await?;
//!
//!     println!("{} ({} tokens)", generation.output.response, generation.metadata.tokens_total);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Submission, polling, typed generation, configuration |
//! | [`transport`] | Authenticated HTTP with per-operation timeouts and body decoding |
//! | [`structured`] | Strict object schemas and output validation |
//! | [`types`] | Request, message, tool and response envelope types |
//! | [`output`] | Output text extraction and decoding |
//! | [`metadata`] | Run metadata (tokens, timing, model snapshot) |
//! | [`error`] | Error taxonomy |

pub mod client;
pub mod metadata;
pub mod output;
pub mod structured;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{
    ClientConfig, CompletedJob, Generation, GenerationOptions, ImageRef, PollPolicy, Prompt,
    ResponsesClient, ResponsesClientBuilder,
};
pub use metadata::RunMetadata;
pub use types::{
    request::{Effort, JobRequest},
    response::{JobResponse, JobStatus},
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
