//! Client for background jobs on the Responses API.
//!
//! Submission, polling and typed generation live in submodules under `src/client/`.

pub mod builder;
pub mod config;
pub mod core;
pub mod generate;
pub mod poll;

pub use builder::ResponsesClientBuilder;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use core::{CompletedJob, ResponsesClient};
pub use generate::{build_request, Generation, GenerationOptions, ImageRef, Prompt};
pub use poll::{wait_for_completion, JobSource, PollPolicy};
