//! Agents and their per-kind configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use super::agent_type::{AgentType, CODING_LANGUAGES, DEFAULT_EMBEDDING_MODEL, RAG_FORMATS};
use super::tool::SelectedTool;
use crate::error::{ApiError, ApiResult};

/// Prompt template given to conversational agents unless the user overrides it
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "You are a helpful AI assistant. Please respond to the following message:\n\n{input}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Active => write!(f, "active"),
            AgentStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl<'de> Deserialize<'de> for AgentStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "active" => Ok(AgentStatus::Active),
            "inactive" => Ok(AgentStatus::Inactive),
            other => Err(serde::de::Error::custom(format!("Unknown agent status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallingConfig {
    /// Names of the tools the agent may call, in selection order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodingConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Server-side templates keyed by coding mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_templates: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Agent configuration, one variant per agent kind
///
/// Serializes to the flat JSON object the backend stores. Keys the typed
/// fields do not cover are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentConfig {
    Conversational(ConversationalConfig),
    Rag(RagConfig),
    ToolCalling(ToolCallingConfig),
    Coding(CodingConfig),
}

impl AgentConfig {
    /// Configuration that serializes to `{}`
    pub fn empty(kind: AgentType) -> Self {
        match kind {
            AgentType::Conversational => AgentConfig::Conversational(Default::default()),
            AgentType::Rag => AgentConfig::Rag(Default::default()),
            AgentType::ToolCalling => AgentConfig::ToolCalling(Default::default()),
            AgentType::Coding => AgentConfig::Coding(Default::default()),
        }
    }

    /// Configuration a new agent of this kind starts with in the creation form
    pub fn defaults_for(kind: AgentType) -> Self {
        match kind {
            AgentType::Conversational => AgentConfig::Conversational(ConversationalConfig {
                prompt_template: Some(DEFAULT_PROMPT_TEMPLATE.to_string()),
                ..Default::default()
            }),
            AgentType::Rag => AgentConfig::Rag(RagConfig {
                supported_formats: RAG_FORMATS.iter().map(|s| s.to_string()).collect(),
                embedding_model: Some(DEFAULT_EMBEDDING_MODEL.to_string()),
                ..Default::default()
            }),
            AgentType::ToolCalling => AgentConfig::ToolCalling(Default::default()),
            AgentType::Coding => AgentConfig::Coding(CodingConfig {
                supported_languages: CODING_LANGUAGES.iter().map(|s| s.to_string()).collect(),
                features: kind
                    .info()
                    .features
                    .unwrap_or_default()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ..Default::default()
            }),
        }
    }

    /// Configuration whose keys are all kept verbatim in `extra`
    pub fn untyped(kind: AgentType, map: Map<String, Value>) -> Self {
        match kind {
            AgentType::Conversational => AgentConfig::Conversational(ConversationalConfig {
                extra: map,
                ..Default::default()
            }),
            AgentType::Rag => AgentConfig::Rag(RagConfig {
                extra: map,
                ..Default::default()
            }),
            AgentType::ToolCalling => AgentConfig::ToolCalling(ToolCallingConfig {
                extra: map,
                ..Default::default()
            }),
            AgentType::Coding => AgentConfig::Coding(CodingConfig {
                extra: map,
                ..Default::default()
            }),
        }
    }

    /// Parse a stored configuration object for the given kind
    pub fn from_map(kind: AgentType, map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let value = Value::Object(map);
        Ok(match kind {
            AgentType::Conversational => AgentConfig::Conversational(serde_json::from_value(value)?),
            AgentType::Rag => AgentConfig::Rag(serde_json::from_value(value)?),
            AgentType::ToolCalling => AgentConfig::ToolCalling(serde_json::from_value(value)?),
            AgentType::Coding => AgentConfig::Coding(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> AgentType {
        match self {
            AgentConfig::Conversational(_) => AgentType::Conversational,
            AgentConfig::Rag(_) => AgentType::Rag,
            AgentConfig::ToolCalling(_) => AgentType::ToolCalling,
            AgentConfig::Coding(_) => AgentType::Coding,
        }
    }

    pub fn prompt_template(&self) -> Option<&str> {
        match self {
            AgentConfig::Conversational(c) => c.prompt_template.as_deref(),
            AgentConfig::ToolCalling(c) => c.prompt_template.as_deref(),
            AgentConfig::Rag(_) | AgentConfig::Coding(_) => None,
        }
    }

    /// Tool names; empty for every kind but tool-calling
    pub fn tools(&self) -> &[String] {
        match self {
            AgentConfig::ToolCalling(c) => &c.tools,
            _ => &[],
        }
    }

    pub fn supported_languages(&self) -> &[String] {
        match self {
            AgentConfig::Coding(c) => &c.supported_languages,
            _ => &[],
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Prompt template for a tool-calling agent, listing every selected tool
pub fn tool_prompt_template(tools: &[SelectedTool]) -> String {
    let listing = tools
        .iter()
        .map(|t| format!("- {}: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a helpful AI assistant with access to the following tools:\n\n{}\n\n\
         Use these tools when they help to answer the request.\n\nRequest: {{input}}",
        listing
    )
}

/// Wire shape of an agent as the backend returns it
#[derive(Debug, Deserialize)]
struct RawAgent {
    id: i64,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    status: Option<AgentStatus>,
    #[serde(default)]
    configuration: Option<Map<String, Value>>,
}

/// A configured agent held by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAgent")]
pub struct Agent {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AgentType,
    pub status: AgentStatus,
    pub configuration: AgentConfig,
}

impl TryFrom<RawAgent> for Agent {
    type Error = String;

    fn try_from(raw: RawAgent) -> Result<Self, Self::Error> {
        let kind: AgentType = raw.kind.parse().map_err(|e: super::agent_type::UnknownAgentType| e.to_string())?;
        let map = raw.configuration.unwrap_or_default();
        let configuration = match AgentConfig::from_map(kind, map.clone()) {
            Ok(configuration) => configuration,
            Err(e) => {
                warn!(agent_id = raw.id, "Keeping configuration untyped: {}", e);
                AgentConfig::untyped(kind, map)
            }
        };
        Ok(Agent {
            id: raw.id,
            name: raw.name,
            kind,
            status: raw.status.unwrap_or_default(),
            configuration,
        })
    }
}

/// Partial agent accepted by `create_agent`; missing fields are validated
/// or defaulted before anything is sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAgent {
    pub name: Option<String>,
    pub kind: Option<AgentType>,
    pub status: Option<AgentStatus>,
    pub configuration: Option<AgentConfig>,
}

impl NewAgent {
    pub fn new(name: impl Into<String>, kind: AgentType) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn with_configuration(mut self, configuration: AgentConfig) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Validate and fill defaults: status `active`, empty configuration
    pub fn into_request(self) -> ApiResult<CreateAgentRequest> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let (Some(name), Some(kind)) = (name, self.kind) else {
            return Err(ApiError::validation("Name and type are required"));
        };
        let configuration = match self.configuration {
            Some(config) if config.kind() == kind => config,
            Some(config) => {
                return Err(ApiError::validation(format!(
                    "Configuration for {} does not match agent type {}",
                    config.kind(),
                    kind
                )))
            }
            None => AgentConfig::empty(kind),
        };
        Ok(CreateAgentRequest {
            name,
            kind,
            status: self.status.unwrap_or_default(),
            configuration,
        })
    }
}

/// JSON body of `POST /agents/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AgentType,
    pub status: AgentStatus,
    pub configuration: AgentConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_type_is_lowercased() {
        let agent: Agent = serde_json::from_value(json!({
            "id": 3,
            "name": "Helper",
            "type": "TOOL_CALLING",
            "status": "ACTIVE",
            "configuration": {"tools": ["add"], "temperature": 0.2}
        }))
        .unwrap();
        assert_eq!(agent.kind, AgentType::ToolCalling);
        assert_eq!(agent.status, AgentStatus::Active);
        assert_eq!(agent.configuration.tools(), &["add".to_string()]);

        let out = serde_json::to_value(&agent).unwrap();
        assert_eq!(out["type"], "tool_calling");
        assert_eq!(out["configuration"]["temperature"], 0.2);
    }

    #[test]
    fn test_missing_configuration_and_status() {
        let agent: Agent =
            serde_json::from_value(json!({"id": 1, "name": "a", "type": "rag"})).unwrap();
        assert_eq!(agent.status, AgentStatus::Active);
        assert_eq!(agent.configuration, AgentConfig::empty(AgentType::Rag));
    }

    #[test]
    fn test_odd_configuration_is_kept_verbatim() {
        let agent: Agent = serde_json::from_value(json!({
            "id": 2,
            "name": "Legacy",
            "type": "rag",
            "configuration": {"supported_formats": null, "chunk_size": 512}
        }))
        .unwrap();
        assert_eq!(agent.kind, AgentType::Rag);
        let out = serde_json::to_value(&agent.configuration).unwrap();
        assert_eq!(out, json!({"supported_formats": null, "chunk_size": 512}));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<Agent, _> =
            serde_json::from_value(json!({"id": 1, "name": "a", "type": "planner"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_agent_requires_name_and_type() {
        let err = NewAgent::default().into_request().unwrap_err();
        assert_eq!(err, ApiError::validation("Name and type are required"));

        let err = NewAgent::new("   ", AgentType::Coding).into_request().unwrap_err();
        assert!(err.is_local());

        let err = NewAgent {
            name: Some("x".into()),
            ..Default::default()
        }
        .into_request()
        .unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn test_new_agent_defaults() {
        let request = NewAgent::new("Helper", AgentType::Coding).into_request().unwrap();
        assert_eq!(request.status, AgentStatus::Active);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"name": "Helper", "type": "coding", "status": "active", "configuration": {}})
        );
    }

    #[test]
    fn test_mismatched_configuration() {
        let err = NewAgent::new("x", AgentType::Rag)
            .with_configuration(AgentConfig::empty(AgentType::Coding))
            .into_request()
            .unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn test_conversational_defaults_carry_prompt_template() {
        let config = AgentConfig::defaults_for(AgentType::Conversational);
        assert_eq!(config.prompt_template(), Some(DEFAULT_PROMPT_TEMPLATE));
        assert_eq!(
            config.to_map()["prompt_template"],
            "You are a helpful AI assistant. Please respond to the following message:\n\n{input}"
        );
    }

    #[test]
    fn test_tool_prompt_template_lists_tools() {
        let template = tool_prompt_template(&[
            SelectedTool::new("add", "Add two integers"),
            SelectedTool::new("multiply", "Multiply two integers"),
        ]);
        assert!(template.contains("- add: Add two integers\n- multiply: Multiply two integers"));
        assert!(template.ends_with("{input}"));
    }
}
