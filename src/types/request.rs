//! Job request and its wire payload for `POST /responses`.

use crate::structured::TextOptions;
use crate::types::message::{InputItem, MessageContent};
use crate::types::tool::{Tool, ToolChoice};
use serde::{Deserialize, Serialize};

/// Reasoning effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Minimal,
    #[default]
    Low,
    Medium,
    High,
}

impl Effort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effort::Minimal => "minimal",
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
        }
    }
}

impl std::fmt::Display for Effort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Effort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(Effort::Minimal),
            "low" => Ok(Effort::Low),
            "medium" => Ok(Effort::Medium),
            "high" => Ok(Effort::High),
            other => Err(format!("Unknown reasoning effort: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reasoning {
    pub effort: Effort,
    /// Reasoning summaries require a verified organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Temperature accepted by every model family (GPT-5 and o-series reject anything else).
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// One generation attempt. Immutable once handed to the client.
///
/// Background execution and storage are not configurable: every job is submitted with
/// `background: true` and `store: true` so it can always be polled by id.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub model: String,
    pub reasoning_effort: Effort,
    pub instructions: String,
    pub developer_message: String,
    pub user_content: MessageContent,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
    pub text: TextOptions,
    pub previous_response_id: Option<String>,
    pub tools: Vec<Tool>,
    pub tool_choice: Option<ToolChoice>,
}

impl JobRequest {
    pub fn new(model: impl Into<String>, reasoning_effort: Effort) -> Self {
        Self {
            model: model.into(),
            reasoning_effort,
            instructions: String::new(),
            developer_message: String::new(),
            user_content: MessageContent::Text(String::new()),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_output_tokens: None,
            text: TextOptions::default(),
            previous_response_id: None,
            tools: Vec::new(),
            tool_choice: None,
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

    pub fn user_content(mut self, content: impl Into<MessageContent>) -> Self {
        self.user_content = content.into();
        self
    }

    pub fn temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    pub fn text(mut self, text: TextOptions) -> Self {
        self.text = text;
        self
    }

    pub fn previous_response_id(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
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

    /// The `input` array: developer message first, then the user content.
    pub fn input(&self) -> Vec<InputItem> {
        vec![
            InputItem::developer(self.developer_message.clone()),
            InputItem::with_content(
                crate::types::message::InputRole::User,
                self.user_content.clone(),
            ),
        ]
    }

    pub(crate) fn to_payload(&self) -> RequestPayload<'_> {
        RequestPayload {
            model: &self.model,
            instructions: &self.instructions,
            input: self.input(),
            reasoning: Reasoning {
                effort: self.reasoning_effort,
                summary: None,
            },
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            background: true,
            store: true,
            text: &self.text,
            tools: &self.tools,
            tool_choice: self.tool_choice.as_ref(),
            previous_response_id: self.previous_response_id.as_deref(),
        }
    }
}

/// Body of `POST /responses`.
#[derive(Debug, Serialize)]
pub(crate) struct RequestPayload<'a> {
    pub model: &'a str,
    pub instructions: &'a str,
    pub input: Vec<InputItem>,
    pub reasoning: Reasoning,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    pub background: bool,
    pub store: bool,
    pub text: &'a TextOptions,
    #[serde(skip_serializing_if = "no_tools")]
    pub tools: &'a [Tool],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<&'a str>,
}

fn no_tools(tools: &&[Tool]) -> bool {
    tools.is_empty()
}
