//! Chat messages, agent replies and coding modes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Capitalized label used when replaying history to the agent
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message shown in the chat panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Code snippets extracted by the coding agent, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Vec<String>>,
    /// Set on user messages that describe an error to troubleshoot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            language: None,
            code: None,
            error: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::user(content)
        }
    }

    /// Assistant message built from a query reply, picking up the
    /// language and formatted code the coding agent reports
    pub fn from_response(response: &QueryResponse) -> Self {
        let language = response
            .metadata
            .get("language")
            .and_then(Value::as_str)
            .map(String::from);
        let code = response
            .metadata
            .get("formatted_code")
            .and_then(Value::as_array)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|blocks| !blocks.is_empty());
        Self {
            role: Role::Assistant,
            content: response.response.clone(),
            timestamp: response.created_at,
            language,
            code,
            error: None,
        }
    }
}

/// How a coding agent should treat the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodingMode {
    #[default]
    Generate,
    Troubleshoot,
    Explain,
}

impl CodingMode {
    pub const ALL: [CodingMode; 3] = [
        CodingMode::Generate,
        CodingMode::Troubleshoot,
        CodingMode::Explain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodingMode::Generate => "generate",
            CodingMode::Troubleshoot => "troubleshoot",
            CodingMode::Explain => "explain",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CodingMode::Generate => "Generate",
            CodingMode::Troubleshoot => "Troubleshoot",
            CodingMode::Explain => "Explain",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            CodingMode::Generate => "Describe the code you want to generate...",
            CodingMode::Troubleshoot => "Paste your code and describe the error...",
            CodingMode::Explain => "Paste the code you want explained...",
        }
    }

    pub fn loading_message(&self) -> &'static str {
        match self {
            CodingMode::Generate => "Generating code...",
            CodingMode::Troubleshoot => "Analyzing the error...",
            CodingMode::Explain => "Explaining code...",
        }
    }
}

impl fmt::Display for CodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generate" => Ok(CodingMode::Generate),
            "troubleshoot" => Ok(CodingMode::Troubleshoot),
            "explain" => Ok(CodingMode::Explain),
            other => Err(format!(
                "Unknown coding mode '{}', expected generate, troubleshoot or explain",
                other
            )),
        }
    }
}

/// Extra form fields sent with a query; values are stringified on the wire
pub type QueryContext = BTreeMap<String, Value>;

/// Render a context value as a multipart text field
pub fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Body of `/agents/{id}/query` and `/agents/{id}/interact` replies
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentReply {
    pub response: String,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Normalized reply handed to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    /// The query as it was sent
    pub message: String,
    /// Stamped when the reply was received; the server sends no timestamp
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl QueryResponse {
    pub fn from_reply(reply: AgentReply, sent: &str) -> Self {
        Self {
            response: reply.response,
            message: sent.to_string(),
            created_at: Utc::now(),
            metadata: reply.metadata.unwrap_or_default(),
        }
    }
}

/// A file picked for upload to a rag agent
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_reply_stamps_client_time() {
        let before = Utc::now();
        let reply: AgentReply = serde_json::from_value(json!({"response": "hi"})).unwrap();
        let response = QueryResponse::from_reply(reply, "hello");
        assert_eq!(response.message, "hello");
        assert!(response.metadata.is_empty());
        assert!(response.created_at >= before);
    }

    #[test]
    fn test_assistant_message_picks_up_code() {
        let reply: AgentReply = serde_json::from_value(json!({
            "response": "```python\nprint(1)\n```",
            "metadata": {"language": "python", "formatted_code": ["print(1)\n"]}
        }))
        .unwrap();
        let msg = Message::from_response(&QueryResponse::from_reply(reply, "print one"));
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.language.as_deref(), Some("python"));
        assert_eq!(msg.code, Some(vec!["print(1)\n".to_string()]));
    }

    #[test]
    fn test_empty_code_list_is_dropped() {
        let reply: AgentReply = serde_json::from_value(json!({
            "response": "no code here",
            "metadata": {"formatted_code": []}
        }))
        .unwrap();
        let msg = Message::from_response(&QueryResponse::from_reply(reply, "q"));
        assert!(msg.code.is_none());
    }

    #[test]
    fn test_coding_mode_strings() {
        for mode in CodingMode::ALL {
            assert_eq!(mode.as_str().parse::<CodingMode>().unwrap(), mode);
            assert!(mode.placeholder().ends_with("..."));
            assert!(mode.loading_message().ends_with("..."));
        }
        assert!("refactor".parse::<CodingMode>().is_err());
    }

    #[test]
    fn test_form_value() {
        assert_eq!(form_value(&json!("python")), "python");
        assert_eq!(form_value(&json!(3)), "3");
        assert_eq!(form_value(&json!(true)), "true");
        assert_eq!(form_value(&json!(["a"])), "[\"a\"]");
    }
}
