//! Server-executed tools available to tool-calling agents

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tools the backend ships with; they are always flagged as samples
pub const SAMPLE_TOOLS: [&str; 2] = ["multiply", "add"];

/// Creator recorded for tools made from this client
pub const DEFAULT_CREATOR: &str = "user";

pub fn is_sample_name(name: &str) -> bool {
    SAMPLE_TOOLS.contains(&name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
    /// ISO-8601 timestamp as reported by the server
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub is_sample: bool,
}

impl Tool {
    /// Listing/get normalization: keep the server flag, add the sample set
    pub fn mark_sample(mut self) -> Self {
        self.is_sample = self.is_sample || is_sample_name(&self.name);
        self
    }

    /// Tools created by a user are never samples, whatever the server says
    pub fn mark_created(mut self) -> Self {
        self.is_sample = false;
        self
    }

    pub fn selection(&self) -> SelectedTool {
        SelectedTool::new(self.name.clone(), self.description.clone())
    }
}

/// Normalize a tool listing
pub fn mark_samples(tools: Vec<Tool>) -> Vec<Tool> {
    tools.into_iter().map(Tool::mark_sample).collect()
}

/// A tool picked in the creation form, before the agent exists
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedTool {
    pub name: String,
    pub description: String,
}

impl SelectedTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Body of `POST /tools`: the server writes the code when none is given
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateToolRequest {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub created_by: String,
}

impl CreateToolRequest {
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: None,
            created_by: DEFAULT_CREATOR.to_string(),
        }
    }
}

/// Body of `POST /tools/code`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateToolFromCodeRequest {
    pub name: String,
    pub code: String,
    pub created_by: String,
}

impl CreateToolFromCodeRequest {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            created_by: DEFAULT_CREATOR.to_string(),
        }
    }
}

/// Body of `POST /tools/{name}/execute`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteToolRequest {
    pub parameters: Value,
}
