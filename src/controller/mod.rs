//! Root controller: the single owner of application state
//!
//! Front ends turn user intent into an [`Action`] and pass it to
//! [`Controller::dispatch`]. The controller updates its [`AppState`] and
//! answers with [`Effect`]s describing the requests to make. Whoever runs
//! those requests reports back with an [`Event`] through
//! [`Controller::handle`]. Nothing in here performs I/O.
//!
//! Every effect carries a [`Ticket`]. Tickets issued for a session are
//! tied to the selection epoch; once another agent is selected their
//! completions are dropped instead of landing in the new conversation.

mod history;
#[cfg(feature = "native")]
pub mod runner;
mod state;

pub use history::{build_query, history_block, HISTORY_WINDOW};
pub use state::{
    AgentDraft, AppState, CreationState, Notice, Screen, Session, ToolManagerState,
    DEFAULT_LANGUAGE,
};

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::agent_type::{supports_format, RAG_FORMATS};
use crate::domain::{
    tool_prompt_template, Agent, AgentConfig, AgentType, CodingMode, CreateToolFromCodeRequest,
    CreateToolRequest, DocumentFile, Message, NewAgent, QueryContext, QueryResponse, SelectedTool,
    Tool, ToolCallingConfig,
};
use crate::error::ApiResult;

/// Identifies one outstanding request
pub type Ticket = u64;

/// Query sent right after a document upload
pub const SUMMARY_QUERY: &str = "Please provide a brief summary of this document.";

/// How long the tool manager shows its success notice
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

pub const NO_TOOLS_SELECTED: &str = "Please select at least one tool for the tool-calling agent";

/// User intent
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Mount,
    RefreshAgents,
    SelectAgent(i64),
    /// Sidebar type filter; resets the draft configuration
    SetDraftType(AgentType),
    SetDraftName(String),
    SetDraftPromptTemplate(String),
    BeginCreate,
    CancelCreate,
    SubmitCreate,
    EditInput(String),
    SetCodingMode(CodingMode),
    SetLanguage(String),
    SendMessage,
    UploadDocument(DocumentFile),
    OpenToolManager,
    CloseToolManager,
    ToggleTool(SelectedTool),
    LoadTools,
    CreateTool {
        description: String,
        code: Option<String>,
    },
    CreateToolFromCode {
        name: String,
        code: String,
    },
    DismissError,
}

/// Work the front end must carry out on the controller's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadAgents {
        ticket: Ticket,
    },
    CreateAgent {
        ticket: Ticket,
        agent: NewAgent,
    },
    UploadDocument {
        ticket: Ticket,
        agent_id: i64,
        file: DocumentFile,
    },
    QueryAgent {
        ticket: Ticket,
        agent_id: i64,
        query: String,
        context: QueryContext,
    },
    LoadTools {
        ticket: Ticket,
    },
    CreateTool {
        ticket: Ticket,
        request: CreateToolRequest,
    },
    CreateToolFromCode {
        ticket: Ticket,
        request: CreateToolFromCodeRequest,
    },
    /// Report [`Event::NoticeExpired`] once `after` has elapsed
    ScheduleNoticeDismiss {
        ticket: Ticket,
        after: Duration,
    },
}

impl Effect {
    pub fn ticket(&self) -> Ticket {
        match self {
            Effect::LoadAgents { ticket }
            | Effect::CreateAgent { ticket, .. }
            | Effect::UploadDocument { ticket, .. }
            | Effect::QueryAgent { ticket, .. }
            | Effect::LoadTools { ticket }
            | Effect::CreateTool { ticket, .. }
            | Effect::CreateToolFromCode { ticket, .. }
            | Effect::ScheduleNoticeDismiss { ticket, .. } => *ticket,
        }
    }
}

/// Completion of an [`Effect`]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    AgentsLoaded {
        ticket: Ticket,
        result: ApiResult<Vec<Agent>>,
    },
    AgentCreated {
        ticket: Ticket,
        result: ApiResult<Agent>,
    },
    DocumentUploaded {
        ticket: Ticket,
        result: ApiResult<Value>,
    },
    QueryAnswered {
        ticket: Ticket,
        result: ApiResult<QueryResponse>,
    },
    ToolsLoaded {
        ticket: Ticket,
        result: ApiResult<Vec<Tool>>,
    },
    /// Both tool creation effects complete with this event
    ToolCreated {
        ticket: Ticket,
        result: ApiResult<Tool>,
    },
    NoticeExpired(Ticket),
}

impl Event {
    pub fn ticket(&self) -> Ticket {
        match self {
            Event::AgentsLoaded { ticket, .. }
            | Event::AgentCreated { ticket, .. }
            | Event::DocumentUploaded { ticket, .. }
            | Event::QueryAnswered { ticket, .. }
            | Event::ToolsLoaded { ticket, .. }
            | Event::ToolCreated { ticket, .. } => *ticket,
            Event::NoticeExpired(ticket) => *ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PendingKind {
    Agents,
    Create,
    Upload { document: String },
    Reply,
    Summary { document: String },
    Tools,
    ToolCreate,
    Notice,
}

impl PendingKind {
    /// Requests whose result belongs to the session they were issued for
    fn session_bound(&self) -> bool {
        matches!(
            self,
            PendingKind::Upload { .. } | PendingKind::Reply | PendingKind::Summary { .. }
        )
    }
}

#[derive(Debug, Clone)]
struct Pending {
    epoch: u64,
    kind: PendingKind,
}

/// Reducer over [`AppState`]
#[derive(Debug, Clone, Default)]
pub struct Controller {
    state: AppState,
    next_ticket: Ticket,
    epoch: u64,
    latest_agents: Option<Ticket>,
    pending: HashMap<Ticket, Pending>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Requests issued and not yet reported back
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn issue(&mut self, kind: PendingKind) -> Ticket {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending.insert(
            ticket,
            Pending {
                epoch: self.epoch,
                kind,
            },
        );
        ticket
    }

    fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.state.error = Some(message);
    }

    /// The session on screen; the one behind the creation form is not editable
    fn visible_session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.state.screen {
            Screen::AwaitingDocument(session) | Screen::Chatting(session) => Some(session),
            _ => None,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        debug!(screen = self.state.screen.name(), "dispatch {:?}", action);
        match action {
            Action::Mount | Action::RefreshAgents => self.load_agents(),
            Action::SelectAgent(agent_id) => {
                self.select_agent(agent_id);
                Vec::new()
            }
            Action::SetDraftType(kind) => {
                self.state.draft.set_kind(kind);
                Vec::new()
            }
            Action::SetDraftName(name) => {
                self.state.draft.name = name;
                Vec::new()
            }
            Action::SetDraftPromptTemplate(template) => {
                self.state.draft.set_prompt_template(template);
                Vec::new()
            }
            Action::BeginCreate => {
                self.begin_create();
                Vec::new()
            }
            Action::CancelCreate => {
                self.cancel_create();
                Vec::new()
            }
            Action::SubmitCreate => self.submit_create(),
            Action::EditInput(text) => {
                if let Some(session) = self.visible_session_mut() {
                    session.input = text;
                }
                Vec::new()
            }
            Action::SetCodingMode(mode) => {
                if let Some(session) = self.visible_session_mut() {
                    session.coding_mode = mode;
                }
                Vec::new()
            }
            Action::SetLanguage(language) => {
                if let Some(session) = self.visible_session_mut() {
                    session.language = language;
                }
                Vec::new()
            }
            Action::SendMessage => self.send_message(),
            Action::UploadDocument(file) => self.upload_document(file),
            Action::OpenToolManager => self.open_tool_manager(),
            Action::CloseToolManager => {
                if let Some(creation) = self.state.creation_mut() {
                    creation.show_tool_manager = false;
                    creation.tool_manager.notice = None;
                }
                Vec::new()
            }
            Action::ToggleTool(tool) => {
                if let Some(creation) = self.state.creation_mut() {
                    creation.toggle(tool);
                }
                Vec::new()
            }
            Action::LoadTools => self.load_tools(),
            Action::CreateTool { description, code } => self.create_tool(description, code),
            Action::CreateToolFromCode { name, code } => self.create_tool_from_code(name, code),
            Action::DismissError => {
                self.state.error = None;
                Vec::new()
            }
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let ticket = event.ticket();
        let Some(pending) = self.pending.remove(&ticket) else {
            debug!(ticket, "ignoring completion for unknown ticket");
            return Vec::new();
        };
        if pending.kind.session_bound() && pending.epoch != self.epoch {
            debug!(ticket, "dropping completion from a previous session");
            return Vec::new();
        }

        match (pending.kind, event) {
            (PendingKind::Agents, Event::AgentsLoaded { result, .. }) => {
                self.agents_loaded(ticket, result);
                Vec::new()
            }
            (PendingKind::Create, Event::AgentCreated { result, .. }) => {
                self.agent_created(result);
                Vec::new()
            }
            (PendingKind::Upload { document }, Event::DocumentUploaded { result, .. }) => {
                self.document_uploaded(document, result)
            }
            (PendingKind::Reply, Event::QueryAnswered { result, .. }) => {
                self.reply_received(result);
                Vec::new()
            }
            (PendingKind::Summary { document }, Event::QueryAnswered { result, .. }) => {
                self.summary_received(document, result);
                Vec::new()
            }
            (PendingKind::Tools, Event::ToolsLoaded { result, .. }) => {
                self.tools_loaded(result);
                Vec::new()
            }
            (PendingKind::ToolCreate, Event::ToolCreated { result, .. }) => {
                self.tool_created(result)
            }
            (PendingKind::Notice, Event::NoticeExpired(_)) => {
                self.notice_expired(ticket);
                Vec::new()
            }
            (kind, event) => {
                warn!(ticket, "completion {:?} does not match request {:?}", event, kind);
                self.abandon(ticket, kind);
                Vec::new()
            }
        }
    }

    /// Clear the in-flight flag a request set when it will never complete
    fn abandon(&mut self, ticket: Ticket, kind: PendingKind) {
        match kind {
            PendingKind::Agents => {
                if self.latest_agents == Some(ticket) {
                    self.state.agents_loading = false;
                }
            }
            PendingKind::Create => {
                if let Some(creation) = self.state.creation_mut() {
                    creation.submitting = false;
                }
            }
            PendingKind::Upload { .. } | PendingKind::Summary { .. } => self.document_done(),
            PendingKind::Reply => {
                if let Some(session) = self.state.session_mut() {
                    session.sending = session.sending.saturating_sub(1);
                }
            }
            PendingKind::Tools => {
                if let Some(creation) = self.state.creation_mut() {
                    creation.tool_manager.loading = false;
                }
            }
            PendingKind::ToolCreate => {
                if let Some(creation) = self.state.creation_mut() {
                    creation.tool_manager.creating = false;
                }
            }
            PendingKind::Notice => {}
        }
    }

    fn load_agents(&mut self) -> Vec<Effect> {
        let ticket = self.issue(PendingKind::Agents);
        self.latest_agents = Some(ticket);
        self.state.agents_loading = true;
        vec![Effect::LoadAgents { ticket }]
    }

    fn agents_loaded(&mut self, ticket: Ticket, result: ApiResult<Vec<Agent>>) {
        if self.latest_agents != Some(ticket) {
            debug!(ticket, "agent list superseded by a newer load");
            return;
        }
        self.state.agents_loading = false;
        match result {
            Ok(agents) => {
                info!("Loaded {} agents", agents.len());
                self.state.agents = agents;
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn select_agent(&mut self, agent_id: i64) {
        let Some(agent) = self.state.find_agent(agent_id).cloned() else {
            self.fail(format!("Agent {} not found", agent_id));
            return;
        };
        self.open_session(agent);
    }

    fn open_session(&mut self, agent: Agent) {
        self.epoch += 1;
        debug!(agent_id = agent.id, epoch = self.epoch, "opening session");
        self.state.screen = Screen::for_session(Session::new(agent));
    }

    fn begin_create(&mut self) {
        if self.state.creation().is_some() {
            return;
        }
        let interrupted = match std::mem::take(&mut self.state.screen) {
            Screen::AwaitingDocument(session) | Screen::Chatting(session) => {
                Some(Box::new(session))
            }
            _ => None,
        };
        self.state.screen = Screen::Creating(CreationState {
            interrupted,
            ..Default::default()
        });
    }

    fn cancel_create(&mut self) {
        let Screen::Creating(creation) = std::mem::take(&mut self.state.screen) else {
            return;
        };
        self.state.draft = AgentDraft::for_kind(self.state.draft.kind);
        self.state.screen = creation
            .interrupted
            .map(|session| Screen::for_session(*session))
            .unwrap_or_default();
    }

    fn submit_create(&mut self) -> Vec<Effect> {
        let Some(creation) = self.state.creation() else {
            return Vec::new();
        };
        if creation.submitting {
            return Vec::new();
        }

        let mut agent = self.state.draft.to_new_agent();
        if self.state.draft.kind == AgentType::ToolCalling {
            if creation.selected_tools.is_empty() {
                self.fail(NO_TOOLS_SELECTED);
                return Vec::new();
            }
            let base = match &self.state.draft.configuration {
                AgentConfig::ToolCalling(config) => config.clone(),
                _ => ToolCallingConfig::default(),
            };
            agent = agent.with_configuration(AgentConfig::ToolCalling(ToolCallingConfig {
                tools: creation.selected_tools.iter().map(|t| t.name.clone()).collect(),
                prompt_template: Some(tool_prompt_template(&creation.selected_tools)),
                ..base
            }));
        }
        if let Err(e) = agent.clone().into_request() {
            self.fail(e.to_string());
            return Vec::new();
        }

        let ticket = self.issue(PendingKind::Create);
        if let Some(creation) = self.state.creation_mut() {
            creation.submitting = true;
        }
        vec![Effect::CreateAgent { ticket, agent }]
    }

    fn agent_created(&mut self, result: ApiResult<Agent>) {
        match result {
            Ok(agent) => {
                info!(agent_id = agent.id, "Created agent '{}'", agent.name);
                self.state.agents.push(agent.clone());
                if self.state.creation().is_some() {
                    self.state.draft = AgentDraft::for_kind(self.state.draft.kind);
                    self.open_session(agent);
                } else {
                    debug!("creation form was left before the agent was created");
                }
            }
            Err(e) => {
                if let Some(creation) = self.state.creation_mut() {
                    creation.submitting = false;
                }
                self.fail(e.to_string());
            }
        }
    }

    fn send_message(&mut self) -> Vec<Effect> {
        let Screen::Chatting(session) = &mut self.state.screen else {
            return Vec::new();
        };
        if session.input.trim().is_empty() {
            return Vec::new();
        }
        let text = session.input.clone();

        let mut message = Message::user(text.clone());
        let mut context = QueryContext::new();
        if session.is_coding() {
            if session.coding_mode == CodingMode::Troubleshoot {
                message.language = Some(session.language.clone());
                message.error = Some(true);
            }
            context.insert("language".into(), Value::String(session.language.clone()));
            context.insert(
                "mode".into(),
                Value::String(session.coding_mode.as_str().to_string()),
            );
        }

        let query = build_query(&session.messages, &text);
        session.messages.push(message);
        session.input.clear();
        session.sending += 1;
        let agent_id = session.agent.id;

        let ticket = self.issue(PendingKind::Reply);
        vec![Effect::QueryAgent {
            ticket,
            agent_id,
            query,
            context,
        }]
    }

    fn reply_received(&mut self, result: ApiResult<QueryResponse>) {
        let Some(session) = self.state.session_mut() else {
            return;
        };
        session.sending = session.sending.saturating_sub(1);
        match result {
            Ok(response) => session.messages.push(Message::from_response(&response)),
            // The user message stays in place
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn upload_document(&mut self, file: DocumentFile) -> Vec<Effect> {
        let Some(session) = self.visible_session_mut() else {
            return Vec::new();
        };
        if session.agent.kind != AgentType::Rag {
            self.fail("Documents can only be uploaded to RAG agents");
            return Vec::new();
        }
        if session.processing_document {
            return Vec::new();
        }
        if file.name.starts_with("~$") {
            self.fail("Temporary Office files cannot be uploaded");
            return Vec::new();
        }
        if !supports_format(&file.name) {
            self.fail(format!(
                "Unsupported file format. Supported formats: {}",
                RAG_FORMATS.join(", ")
            ));
            return Vec::new();
        }

        session.processing_document = true;
        let agent_id = session.agent.id;
        let ticket = self.issue(PendingKind::Upload {
            document: file.name.clone(),
        });
        vec![Effect::UploadDocument {
            ticket,
            agent_id,
            file,
        }]
    }

    fn document_uploaded(&mut self, document: String, result: ApiResult<Value>) -> Vec<Effect> {
        let Some(agent_id) = self.state.selected_agent_id() else {
            return Vec::new();
        };
        match result {
            Ok(_) => {
                info!(agent_id, "Uploaded '{}', requesting summary", document);
                let ticket = self.issue(PendingKind::Summary { document });
                vec![Effect::QueryAgent {
                    ticket,
                    agent_id,
                    query: SUMMARY_QUERY.to_string(),
                    context: QueryContext::new(),
                }]
            }
            Err(e) => {
                self.document_done();
                self.fail(e.to_string());
                Vec::new()
            }
        }
    }

    fn summary_received(&mut self, document: String, result: ApiResult<QueryResponse>) {
        self.document_done();
        match result {
            Ok(response) => {
                if let Some(session) = self.state.session_mut() {
                    session.messages = vec![Message::from_response(&response)];
                    session.document = Some(document);
                }
                let screen = std::mem::take(&mut self.state.screen);
                self.state.screen = match screen {
                    Screen::AwaitingDocument(session) => Screen::Chatting(session),
                    other => other,
                };
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn document_done(&mut self) {
        if let Some(session) = self.state.session_mut() {
            session.processing_document = false;
        }
    }

    fn open_tool_manager(&mut self) -> Vec<Effect> {
        let Some(creation) = self.state.creation_mut() else {
            return Vec::new();
        };
        creation.show_tool_manager = true;
        self.load_tools()
    }

    fn load_tools(&mut self) -> Vec<Effect> {
        let Some(creation) = self.state.creation_mut() else {
            return Vec::new();
        };
        creation.tool_manager.loading = true;
        let ticket = self.issue(PendingKind::Tools);
        vec![Effect::LoadTools { ticket }]
    }

    fn tools_loaded(&mut self, result: ApiResult<Vec<Tool>>) {
        let Some(creation) = self.state.creation_mut() else {
            debug!("tool list arrived after the creation form closed");
            return;
        };
        creation.tool_manager.loading = false;
        match result {
            Ok(tools) => creation.tool_manager.tools = tools,
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn create_tool(&mut self, description: String, code: Option<String>) -> Vec<Effect> {
        let description = description.trim().to_string();
        if description.is_empty() {
            self.fail("Tool description is required");
            return Vec::new();
        }
        let request = CreateToolRequest {
            code: code.filter(|c| !c.trim().is_empty()),
            ..CreateToolRequest::from_description(description)
        };
        match self.begin_tool_create() {
            Some(ticket) => vec![Effect::CreateTool { ticket, request }],
            None => Vec::new(),
        }
    }

    fn create_tool_from_code(&mut self, name: String, code: String) -> Vec<Effect> {
        let name = name.trim().to_string();
        if name.is_empty() || code.trim().is_empty() {
            self.fail("Tool name and code are required");
            return Vec::new();
        }
        let request = CreateToolFromCodeRequest::new(name, code);
        match self.begin_tool_create() {
            Some(ticket) => vec![Effect::CreateToolFromCode { ticket, request }],
            None => Vec::new(),
        }
    }

    fn begin_tool_create(&mut self) -> Option<Ticket> {
        let creation = self.state.creation_mut()?;
        if creation.tool_manager.creating {
            return None;
        }
        creation.tool_manager.creating = true;
        Some(self.issue(PendingKind::ToolCreate))
    }

    fn tool_created(&mut self, result: ApiResult<Tool>) -> Vec<Effect> {
        if self.state.creation().is_none() {
            debug!("tool created after the creation form closed");
            return Vec::new();
        }
        match result {
            Ok(tool) => {
                info!("Created tool '{}'", tool.name);
                let ticket = self.issue(PendingKind::Notice);
                if let Some(creation) = self.state.creation_mut() {
                    let manager = &mut creation.tool_manager;
                    manager.creating = false;
                    manager.notice = Some(Notice {
                        ticket,
                        text: format!("Tool '{}' created successfully", tool.name),
                    });
                    manager.tools.retain(|t| t.name != tool.name);
                    manager.tools.push(tool);
                }
                vec![Effect::ScheduleNoticeDismiss {
                    ticket,
                    after: NOTICE_DURATION,
                }]
            }
            Err(e) => {
                if let Some(creation) = self.state.creation_mut() {
                    creation.tool_manager.creating = false;
                }
                self.fail(e.to_string());
                Vec::new()
            }
        }
    }

    fn notice_expired(&mut self, ticket: Ticket) {
        let Some(creation) = self.state.creation_mut() else {
            return;
        };
        if creation.tool_manager.notice.as_ref().map(|n| n.ticket) == Some(ticket) {
            creation.tool_manager.notice = None;
            creation.show_tool_manager = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AgentStatus;

    fn agent(id: i64, kind: AgentType) -> Agent {
        Agent {
            id,
            name: format!("agent-{}", id),
            kind,
            status: AgentStatus::Active,
            configuration: AgentConfig::empty(kind),
        }
    }

    #[test]
    fn test_effect_tickets_increase() {
        let mut controller = Controller::new();
        let first = controller.dispatch(Action::Mount);
        let second = controller.dispatch(Action::RefreshAgents);
        assert!(second[0].ticket() > first[0].ticket());
        assert_eq!(controller.pending_count(), 2);
    }

    #[test]
    fn test_unknown_ticket_is_ignored() {
        let mut controller = Controller::new();
        let effects = controller.handle(Event::NoticeExpired(42));
        assert!(effects.is_empty());
        assert_eq!(controller.state(), &AppState::default());
    }

    #[test]
    fn test_mismatched_completion_clears_loading() {
        let mut controller = Controller::new();
        let ticket = controller.dispatch(Action::Mount)[0].ticket();
        controller.handle(Event::ToolsLoaded {
            ticket,
            result: Ok(Vec::new()),
        });
        assert!(!controller.state().agents_loading);
        assert!(controller.state().agents.is_empty());
        assert_eq!(controller.pending_count(), 0);
    }

    #[test]
    fn test_upload_rejected_for_other_kinds() {
        let mut controller = Controller::new();
        let ticket = controller.dispatch(Action::Mount)[0].ticket();
        controller.handle(Event::AgentsLoaded {
            ticket,
            result: Ok(vec![agent(1, AgentType::Conversational)]),
        });
        controller.dispatch(Action::SelectAgent(1));
        let effects = controller.dispatch(Action::UploadDocument(DocumentFile::new("a.pdf", vec![1])));
        assert!(effects.is_empty());
        assert_eq!(
            controller.state().error.as_deref(),
            Some("Documents can only be uploaded to RAG agents")
        );
    }
}
