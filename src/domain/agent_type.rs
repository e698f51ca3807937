//! Agent kinds and their static metadata

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of agent the backend knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    #[default]
    Conversational,
    Rag,
    ToolCalling,
    Coding,
}

impl AgentType {
    pub const ALL: [AgentType; 4] = [
        AgentType::Conversational,
        AgentType::Rag,
        AgentType::ToolCalling,
        AgentType::Coding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Conversational => "conversational",
            AgentType::Rag => "rag",
            AgentType::ToolCalling => "tool_calling",
            AgentType::Coding => "coding",
        }
    }

    /// Registry entry for this kind
    pub fn info(&self) -> &'static AgentTypeInfo {
        match self {
            AgentType::Conversational => &AGENT_TYPES[0],
            AgentType::Rag => &AGENT_TYPES[1],
            AgentType::ToolCalling => &AGENT_TYPES[2],
            AgentType::Coding => &AGENT_TYPES[3],
        }
    }

    /// Rag agents cannot chat until a document has been uploaded
    pub fn requires_document(&self) -> bool {
        matches!(self, AgentType::Rag)
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown agent type: {0}")]
pub struct UnknownAgentType(pub String);

impl FromStr for AgentType {
    type Err = UnknownAgentType;

    /// Case-insensitive; the backend stores kinds upper case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conversational" => Ok(AgentType::Conversational),
            "rag" => Ok(AgentType::Rag),
            "tool_calling" => Ok(AgentType::ToolCalling),
            "coding" => Ok(AgentType::Coding),
            _ => Err(UnknownAgentType(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for AgentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Static description of an agent kind, used by the sidebar filter,
/// the welcome screen and the upload panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTypeInfo {
    pub id: AgentType,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub supported_formats: Option<&'static [&'static str]>,
    pub supported_languages: Option<&'static [&'static str]>,
    pub features: Option<&'static [&'static str]>,
}

pub const RAG_FORMATS: &[&str] = &[
    ".pdf", ".txt", ".doc", ".docx", ".xlsx", ".xls", ".csv", ".pptx", ".ppt", ".png", ".jpg",
    ".jpeg", ".gif", ".bmp", ".md", ".json",
];

pub const CODING_LANGUAGES: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "c++",
    "go",
    "rust",
];

pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

static AGENT_TYPES: [AgentTypeInfo; 4] = [
    AgentTypeInfo {
        id: AgentType::Conversational,
        name: "Conversational Agent",
        icon: "💬",
        description: "A general-purpose AI assistant for natural conversations.",
        supported_formats: None,
        supported_languages: None,
        features: Some(&[
            "Natural Conversations",
            "Custom Prompt Templates",
            "Chat History Context",
        ]),
    },
    AgentTypeInfo {
        id: AgentType::Rag,
        name: "Document Q&A Agent",
        icon: "📚",
        description: "A document-aware AI assistant that can answer questions based on uploaded files.",
        supported_formats: Some(RAG_FORMATS),
        supported_languages: None,
        features: Some(&[
            "Document Upload",
            "Automatic Summaries",
            "Source-grounded Answers",
        ]),
    },
    AgentTypeInfo {
        id: AgentType::ToolCalling,
        name: "Tool-Calling Agent",
        icon: "🔧",
        description: "An AI assistant that can use external tools and APIs to help accomplish tasks.",
        supported_formats: None,
        supported_languages: None,
        features: Some(&[
            "Custom Tools",
            "Tools from Code",
            "Multi-step Execution",
        ]),
    },
    AgentTypeInfo {
        id: AgentType::Coding,
        name: "Coding Assistant",
        icon: "💻",
        description: "An expert coding assistant that generates clean, formatted code.",
        supported_formats: None,
        supported_languages: Some(CODING_LANGUAGES),
        features: Some(&[
            "Code Generation",
            "Error Troubleshooting",
            "Code Explanation",
            "Best Practices",
            "Code Review",
            "Performance Tips",
        ]),
    },
];

/// All agent kinds in display order
pub fn registry() -> &'static [AgentTypeInfo] {
    &AGENT_TYPES
}

/// Look up a kind by its id string
pub fn lookup(id: &str) -> Option<&'static AgentTypeInfo> {
    id.parse::<AgentType>().ok().map(|kind| kind.info())
}

/// Whether a rag agent accepts this file, judged by extension
pub fn supports_format(file_name: &str) -> bool {
    let Some(dot) = file_name.rfind('.') else {
        return false;
    };
    let ext = file_name[dot..].to_ascii_lowercase();
    RAG_FORMATS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_rag_formats() {
        let info = lookup("rag").unwrap();
        let formats = info.supported_formats.unwrap();
        for ext in [".pdf", ".docx", ".csv"] {
            assert!(formats.contains(&ext), "missing {}", ext);
        }
        assert!(info.supported_languages.is_none());
    }

    #[test]
    fn test_lookup_coding_languages() {
        let info = lookup("coding").unwrap();
        let languages = info.supported_languages.unwrap();
        assert!(languages.contains(&"python"));
        assert!(languages.contains(&"rust"));
        assert_eq!(info.features.unwrap().len(), 6);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("planner").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_registry_matches_kinds() {
        let ids: Vec<AgentType> = registry().iter().map(|i| i.id).collect();
        assert_eq!(ids, AgentType::ALL.to_vec());
        for kind in AgentType::ALL {
            assert_eq!(kind.info().id, kind);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("TOOL_CALLING".parse::<AgentType>().unwrap(), AgentType::ToolCalling);
        assert_eq!("Rag".parse::<AgentType>().unwrap(), AgentType::Rag);
        let kind: AgentType = serde_json::from_str("\"CODING\"").unwrap();
        assert_eq!(kind, AgentType::Coding);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"coding\"");
    }

    #[test]
    fn test_supports_format() {
        assert!(supports_format("report.PDF"));
        assert!(supports_format("notes.md"));
        assert!(!supports_format("binary.exe"));
        assert!(!supports_format("README"));
    }
}
