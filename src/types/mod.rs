//! Core type definitions (requests, responses, messages, tools).

pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{ContentPart, ImageDetail, InputItem, InputRole, MessageContent};
pub use request::{Effort, JobRequest, Reasoning, DEFAULT_TEMPERATURE};
pub use response::{JobResponse, JobStatus, OutputContent, OutputItem, Usage, VendorError};
pub use tool::{Tool, ToolChoice, ToolChoiceMode, WebSearchTool};
