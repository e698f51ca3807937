//! Application state owned by the controller

use crate::domain::{
    Agent, AgentConfig, AgentType, CodingMode, Message, NewAgent, SelectedTool, Tool,
};

use super::Ticket;

/// Language preselected for coding agents
pub const DEFAULT_LANGUAGE: &str = "python";

/// Everything the front ends render
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub agents: Vec<Agent>,
    pub agents_loading: bool,
    /// Agent being assembled in the creation form; survives cancels of the
    /// type filter, reset after a successful create or a cancel
    pub draft: AgentDraft,
    pub screen: Screen,
    /// Single error banner; a later failure overwrites an earlier one
    pub error: Option<String>,
}

impl AppState {
    /// The session currently shown, or the one interrupted by the creation form
    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::AwaitingDocument(session) | Screen::Chatting(session) => Some(session),
            Screen::Creating(creation) => creation.interrupted.as_deref(),
            Screen::Idle => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.screen {
            Screen::AwaitingDocument(session) | Screen::Chatting(session) => Some(session),
            Screen::Creating(creation) => creation.interrupted.as_deref_mut(),
            Screen::Idle => None,
        }
    }

    pub fn selected_agent_id(&self) -> Option<i64> {
        self.session().map(|s| s.agent.id)
    }

    pub fn creation(&self) -> Option<&CreationState> {
        match &self.screen {
            Screen::Creating(creation) => Some(creation),
            _ => None,
        }
    }

    pub fn creation_mut(&mut self) -> Option<&mut CreationState> {
        match &mut self.screen {
            Screen::Creating(creation) => Some(creation),
            _ => None,
        }
    }

    pub fn find_agent(&self, agent_id: i64) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == agent_id)
    }
}

/// What the main panel shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Screen {
    #[default]
    Idle,
    Creating(CreationState),
    /// A rag agent is selected but no document has been processed yet
    AwaitingDocument(Session),
    Chatting(Session),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Idle => "idle",
            Screen::Creating(_) => "creating",
            Screen::AwaitingDocument(_) => "awaiting_document",
            Screen::Chatting(_) => "chatting",
        }
    }

    /// Screen a freshly selected agent starts on
    pub fn for_session(session: Session) -> Self {
        if session.needs_document() {
            Screen::AwaitingDocument(session)
        } else {
            Screen::Chatting(session)
        }
    }
}

/// Conversation with the selected agent
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub agent: Agent,
    pub messages: Vec<Message>,
    pub input: String,
    /// Name of the document processed for a rag agent
    pub document: Option<String>,
    pub coding_mode: CodingMode,
    pub language: String,
    /// Replies still outstanding; sends may overlap
    pub sending: usize,
    pub processing_document: bool,
}

impl Session {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            messages: Vec::new(),
            input: String::new(),
            document: None,
            coding_mode: CodingMode::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            sending: 0,
            processing_document: false,
        }
    }

    pub fn is_coding(&self) -> bool {
        self.agent.kind == AgentType::Coding
    }

    pub fn is_sending(&self) -> bool {
        self.sending > 0
    }

    pub fn needs_document(&self) -> bool {
        self.agent.kind.requires_document() && self.document.is_none()
    }

    /// Text shown while a reply is outstanding
    pub fn loading_message(&self) -> &'static str {
        if self.is_coding() {
            self.coding_mode.loading_message()
        } else {
            "Thinking..."
        }
    }

    pub fn placeholder(&self) -> &'static str {
        if self.is_coding() {
            self.coding_mode.placeholder()
        } else {
            "Type your message..."
        }
    }
}

/// Agent-creation form, with the tool manager as a nested panel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreationState {
    pub show_tool_manager: bool,
    pub selected_tools: Vec<SelectedTool>,
    pub tool_manager: ToolManagerState,
    pub submitting: bool,
    /// Session to return to when the form is cancelled
    pub interrupted: Option<Box<Session>>,
}

impl CreationState {
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_tools.iter().any(|t| t.name == name)
    }

    /// Add the tool, or remove it when it is already selected
    pub fn toggle(&mut self, tool: SelectedTool) {
        if let Some(pos) = self.selected_tools.iter().position(|t| t.name == tool.name) {
            self.selected_tools.remove(pos);
        } else {
            self.selected_tools.push(tool);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolManagerState {
    pub tools: Vec<Tool>,
    pub loading: bool,
    pub creating: bool,
    pub notice: Option<Notice>,
}

/// Transient success message; cleared by the timer carrying the same ticket
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub ticket: Ticket,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentDraft {
    pub name: String,
    pub kind: AgentType,
    pub configuration: AgentConfig,
}

impl Default for AgentDraft {
    fn default() -> Self {
        Self::for_kind(AgentType::default())
    }
}

impl AgentDraft {
    pub fn for_kind(kind: AgentType) -> Self {
        Self {
            name: String::new(),
            kind,
            configuration: AgentConfig::defaults_for(kind),
        }
    }

    /// Switch kind, resetting the configuration to the kind's defaults
    pub fn set_kind(&mut self, kind: AgentType) {
        self.kind = kind;
        self.configuration = AgentConfig::defaults_for(kind);
    }

    /// Override the prompt template; ignored by kinds without one
    pub fn set_prompt_template(&mut self, template: String) {
        match &mut self.configuration {
            AgentConfig::Conversational(c) => c.prompt_template = Some(template),
            AgentConfig::ToolCalling(c) => c.prompt_template = Some(template),
            AgentConfig::Rag(_) | AgentConfig::Coding(_) => {}
        }
    }

    pub fn to_new_agent(&self) -> NewAgent {
        NewAgent::new(self.name.clone(), self.kind).with_configuration(self.configuration.clone())
    }
}
