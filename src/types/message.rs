//! Input messages for the Responses API.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entry of the request's `input` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    pub role: InputRole,
    pub content: MessageContent,
}

impl InputItem {
    pub fn developer(text: impl Into<String>) -> Self {
        Self {
            role: InputRole::Developer,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: InputRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: InputRole::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn with_content(role: InputRole, content: MessageContent) -> Self {
        Self { role, content }
    }

    pub fn contains_image(&self) -> bool {
        match &self.content {
            MessageContent::Text(_) => false,
            MessageContent::Parts(parts) => parts
                .iter()
                .any(|p| matches!(p, ContentPart::InputImage { .. })),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRole {
    Developer,
    User,
    Assistant,
    Tool,
}

/// Message content: a plain string, or an array of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }

    /// Text accompanied by one image (URL or data URL).
    pub fn text_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        MessageContent::Parts(vec![
            ContentPart::input_text(text),
            ContentPart::input_image(image_url),
        ])
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "input_text")]
    InputText { text: String },
    #[serde(rename = "input_image")]
    InputImage {
        image_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<ImageDetail>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Low,
    High,
    Auto,
}

impl ContentPart {
    pub fn input_text(text: impl Into<String>) -> Self {
        ContentPart::InputText { text: text.into() }
    }

    pub fn input_image(image_url: impl Into<String>) -> Self {
        ContentPart::InputImage {
            image_url: image_url.into(),
            detail: None,
        }
    }

    /// Read an image from disk and inline it as a base64 data URL.
    pub fn image_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Self::input_image(image_data_url(path)?))
    }
}

/// Build `data:<mime>;base64,<payload>` for an image file.
pub fn image_data_url(path: impl AsRef<Path>) -> crate::Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        crate::Error::io(
            e,
            crate::ErrorContext::new()
                .with_operation("read_image")
                .with_details(path.display().to_string()),
        )
    })?;
    let media_type = guess_media_type(path).unwrap_or("image/png");
    let data = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", media_type, data))
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let mt = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(mt)
}
