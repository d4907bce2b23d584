//! Tool configuration passed through to the Responses API.
//!
//! Vendor tool shapes are open-ended, so anything beyond the typed web-search tool
//! travels as opaque JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tool {
    WebSearch(WebSearchTool),
    Raw(serde_json::Value),
}

impl Tool {
    /// The tool's `type` discriminator, if present.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Tool::WebSearch(t) => Some(t.kind.as_str()),
            Tool::Raw(v) => v.get("type").and_then(|t| t.as_str()),
        }
    }
}

impl From<WebSearchTool> for Tool {
    fn from(tool: WebSearchTool) -> Self {
        Tool::WebSearch(tool)
    }
}

impl From<serde_json::Value> for Tool {
    fn from(value: serde_json::Value) -> Self {
        Tool::Raw(value)
    }
}

/// `{"type":"web_search", ...}`. Cannot be combined with `minimal` reasoning effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchTool {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<WebSearchFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_location: Option<UserLocation>,
    /// "low" | "medium" | "high"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_context_size: Option<String>,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self {
            kind: "web_search".to_string(),
            filters: None,
            user_location: None,
            search_context_size: Some("medium".to_string()),
        }
    }
}

impl WebSearchTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Web search restricted to the given domains. An empty list means no restriction.
    pub fn allowed_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let domains: Vec<String> = domains.into_iter().map(Into::into).collect();
        let mut tool = Self::default();
        if !domains.is_empty() {
            tool.filters = Some(WebSearchFilters {
                allowed_domains: domains,
                excluded_domains: Vec::new(),
            });
        }
        tool
    }

    pub fn with_user_location(mut self, location: UserLocation) -> Self {
        self.user_location = Some(location);
        self
    }

    pub fn with_context_size(mut self, size: impl Into<String>) -> Self {
        self.search_context_size = Some(size.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLocation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate: Option<ApproximateLocation>,
}

impl UserLocation {
    pub fn approximate(location: ApproximateLocation) -> Self {
        Self {
            kind: "approximate".to_string(),
            approximate: Some(location),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproximateLocation {
    /// ISO-3166 alpha-2, e.g. "US"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// IANA tz, e.g. "America/Bogota"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// `tool_choice`: a mode keyword or a vendor-specific object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(ToolChoiceMode),
    Specific(serde_json::Value),
}

impl Default for ToolChoice {
    fn default() -> Self {
        ToolChoice::Mode(ToolChoiceMode::Auto)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceMode {
    Auto,
    None,
    Required,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_web_search_defaults() {
        let tool: Tool = WebSearchTool::new().into();
        assert_eq!(tool.kind(), Some("web_search"));
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({"type": "web_search", "search_context_size": "medium"})
        );
    }

    #[test]
    fn test_web_search_with_domains() {
        let tool = WebSearchTool::allowed_domains(["ft.com", "wsj.com"]);
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({
                "type": "web_search",
                "filters": {"allowed_domains": ["ft.com", "wsj.com"]},
                "search_context_size": "medium"
            })
        );
        let unrestricted = WebSearchTool::allowed_domains(Vec::<String>::new());
        assert!(unrestricted.filters.is_none());
    }

    #[test]
    fn test_raw_tools_pass_through() {
        let raw = json!({"type": "function", "name": "lookup", "parameters": {}});
        let tool = Tool::from(raw.clone());
        assert_eq!(tool.kind(), Some("function"));
        assert_eq!(serde_json::to_value(&tool).unwrap(), raw);
    }

    #[test]
    fn test_tool_choice_shapes() {
        assert_eq!(serde_json::to_value(ToolChoice::default()).unwrap(), json!("auto"));
        assert_eq!(
            serde_json::to_value(ToolChoice::Mode(ToolChoiceMode::Required)).unwrap(),
            json!("required")
        );
        let specific = json!({"type": "function", "name": "lookup"});
        assert_eq!(
            serde_json::to_value(ToolChoice::Specific(specific.clone())).unwrap(),
            specific
        );
    }
}
