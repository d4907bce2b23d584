//! Typed structured generation: prompt in, decoded value plus run metadata out.

use crate::client::core::{CompletedJob, ResponsesClient};
use crate::metadata::RunMetadata;
use crate::output::{decode_output, decode_validated_output};
use crate::structured::{strict_object, OutputValidator, TextOptions};
use crate::types::message::{ContentPart, MessageContent};
use crate::types::request::{Effort, JobRequest};
use crate::types::tool::{Tool, ToolChoice};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "gpt-5-mini";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;
pub const DEFAULT_SCHEMA_NAME: &str = "structured_output";

/// Image attached to the user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Remote URL or ready-made data URL.
    Url(String),
    /// Local file, inlined as a base64 data URL at request time.
    File(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    pub instructions: String,
    pub developer_message: String,
    pub user_message: String,
    pub image: Option<ImageRef>,
}

impl Prompt {
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            ..Default::default()
        }
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn developer_message(mut self, message: impl Into<String>) -> Self {
        self.developer_message = message.into();
        self
    }

    pub fn image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Plain text, or text followed by the image.
    fn user_content(&self) -> Result<MessageContent> {
        let image_url = match &self.image {
            None => return Ok(MessageContent::text(self.user_message.clone())),
            Some(ImageRef::Url(url)) => url.clone(),
            Some(ImageRef::File(path)) => crate::types::message::image_data_url(path)?,
        };
        Ok(MessageContent::Parts(vec![
            ContentPart::input_text(self.user_message.clone()),
            ContentPart::input_image(image_url),
        ]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub effort: Effort,
    pub max_output_tokens: u32,
    /// Name of the `json_schema` format sent to the vendor.
    pub schema_name: String,
    pub tools: Vec<Tool>,
    /// `auto` when unset.
    pub tool_choice: Option<ToolChoice>,
    pub previous_response_id: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            effort: Effort::default(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
            tools: Vec::new(),
            tool_choice: None,
            previous_response_id: None,
        }
    }
}

impl GenerationOptions {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn effort(mut self, effort: Effort) -> Self {
        self.effort = effort;
        self
    }

    pub fn max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    pub fn previous_response_id(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
        self
    }
}

/// Decoded output of one job plus how it was produced.
#[derive(Debug, Clone)]
pub struct Generation<T> {
    pub output: T,
    pub metadata: RunMetadata,
    pub raw_text: String,
}

/// Build a strict-schema request from a prompt and top-level schema properties.
pub fn build_request(
    prompt: &Prompt,
    schema_properties: Map<String, Value>,
    options: &GenerationOptions,
) -> Result<JobRequest> {
    let schema = strict_object(Some(schema_properties));
    let mut request = JobRequest::new(options.model.clone(), options.effort)
        .instructions(prompt.instructions.clone())
        .developer_message(prompt.developer_message.clone())
        .user_content(prompt.user_content()?)
        .max_output_tokens(options.max_output_tokens)
        .text(TextOptions::json_schema(options.schema_name.clone(), schema, true))
        .tools(options.tools.clone())
        .tool_choice(options.tool_choice.clone().unwrap_or_default());
    if let Some(id) = &options.previous_response_id {
        request = request.previous_response_id(id.clone());
    }
    Ok(request)
}

impl ResponsesClient {
    /// Run `request` and decode its output into `T`.
    ///
    /// When the request carries a JSON schema and output validation is on, the output is
    /// checked against the schema first.
    pub async fn generate<T: DeserializeOwned>(&self, request: &JobRequest) -> Result<Generation<T>> {
        let validator = match request.text.schema() {
            Some(schema) if self.config().validate_output => {
                Some(OutputValidator::new(schema).map_err(|e| {
                    Error::configuration_with_context(
                        format!("unusable output schema: {}", e),
                        ErrorContext::new().with_operation("validate_output"),
                    )
                })?)
            }
            _ => None,
        };

        let CompletedJob {
            response,
            text,
            metadata,
        } = self.run(request).await?;
        debug!(job_id = response.id.as_str(), text_len = text.len(), "decoding output");

        let decoded = match &validator {
            Some(v) => decode_validated_output(&text, &response.id, v),
            None => decode_output(&text, &response.id),
        };
        let output = match decoded {
            Ok(output) => output,
            Err(e) => return Err(e.with_metadata(metadata)),
        };
        info!(job_id = response.id.as_str(), "output decoded");

        Ok(Generation {
            output,
            metadata,
            raw_text: text,
        })
    }

    /// Prompt plus schema properties in, decoded `T` plus run metadata out.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &Prompt,
        schema_properties: Map<String, Value>,
        options: &GenerationOptions,
    ) -> Result<Generation<T>> {
        let request = build_request(prompt, schema_properties, options)?;
        self.generate(&request).await
    }
}
