//! Native driver for the controller
//!
//! Effects run on spawned tokio tasks against an [`AgentApi`]; their
//! completions come back through an unbounded channel and are applied to
//! the controller one at a time, in arrival order.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use super::{Action, AppState, Controller, Effect, Event};
use crate::client::AgentApi;
use crate::domain::{Agent, AgentType};

pub struct Runner {
    api: Arc<dyn AgentApi>,
    controller: Controller,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl Runner {
    pub fn new(api: Arc<dyn AgentApi>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            controller: Controller::new(),
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Apply an action and start whatever requests it asks for
    pub fn dispatch(&mut self, action: Action) {
        let effects = self.controller.dispatch(action);
        self.spawn_all(effects);
    }

    /// Wait for the next completion and apply it. Returns false when
    /// nothing is outstanding.
    pub async fn step(&mut self) -> bool {
        if self.controller.pending_count() == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                let effects = self.controller.handle(event);
                self.spawn_all(effects);
                true
            }
            None => false,
        }
    }

    /// Apply completions until no request is outstanding
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Dispatch and wait for everything the action set in motion
    pub async fn run(&mut self, action: Action) -> &AppState {
        self.dispatch(action);
        self.settle().await;
        self.state()
    }

    /// Fill in and submit the creation form, selecting `tools` by name.
    ///
    /// A banner left over from earlier actions is cleared first, so the
    /// error returned always comes from this creation.
    pub async fn create_agent(
        &mut self,
        name: String,
        kind: AgentType,
        prompt_template: Option<String>,
        tools: &[String],
    ) -> Result<Agent, String> {
        self.dispatch(Action::DismissError);
        self.dispatch(Action::BeginCreate);
        self.dispatch(Action::SetDraftType(kind));
        self.dispatch(Action::SetDraftName(name));
        if let Some(template) = prompt_template {
            self.dispatch(Action::SetDraftPromptTemplate(template));
        }
        if kind == AgentType::ToolCalling && !tools.is_empty() {
            self.run(Action::OpenToolManager).await;
            if let Some(message) = self.take_error() {
                return Err(message);
            }
            let available = self
                .state()
                .creation()
                .map(|c| c.tool_manager.tools.clone())
                .unwrap_or_default();
            for name in tools {
                let Some(tool) = available.iter().find(|t| &t.name == name) else {
                    self.dispatch(Action::CancelCreate);
                    return Err(format!("Unknown tool '{}'", name));
                };
                self.dispatch(Action::ToggleTool(tool.selection()));
            }
            self.dispatch(Action::CloseToolManager);
        }

        self.run(Action::SubmitCreate).await;
        if let Some(message) = self.take_error() {
            self.dispatch(Action::CancelCreate);
            return Err(message);
        }
        match self.state().creation() {
            Some(_) => Err("Agent was not created".to_string()),
            None => self
                .state()
                .session()
                .map(|s| s.agent.clone())
                .ok_or_else(|| "Agent was not created".to_string()),
        }
    }

    fn take_error(&mut self) -> Option<String> {
        let message = self.state().error.clone()?;
        self.dispatch(Action::DismissError);
        Some(message)
    }

    fn spawn_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            let api = Arc::clone(&self.api);
            let events_tx = self.events_tx.clone();
            tokio::spawn(async move {
                let event = perform(api.as_ref(), effect).await;
                if events_tx.send(event).is_err() {
                    debug!("runner gone before the request completed");
                }
            });
        }
    }
}

/// Carry out one effect and describe its outcome
pub async fn perform(api: &dyn AgentApi, effect: Effect) -> Event {
    match effect {
        Effect::LoadAgents { ticket } => Event::AgentsLoaded {
            ticket,
            result: api.list_agents().await,
        },
        Effect::CreateAgent { ticket, agent } => Event::AgentCreated {
            ticket,
            result: api.create_agent(agent).await,
        },
        Effect::UploadDocument {
            ticket,
            agent_id,
            file,
        } => Event::DocumentUploaded {
            ticket,
            result: api.upload_document(agent_id, file).await,
        },
        Effect::QueryAgent {
            ticket,
            agent_id,
            query,
            context,
        } => Event::QueryAnswered {
            ticket,
            result: api.query_agent(agent_id, &query, &context).await,
        },
        Effect::LoadTools { ticket } => Event::ToolsLoaded {
            ticket,
            result: api.list_tools().await,
        },
        Effect::CreateTool { ticket, request } => Event::ToolCreated {
            ticket,
            result: api.create_tool(&request).await,
        },
        Effect::CreateToolFromCode { ticket, request } => Event::ToolCreated {
            ticket,
            result: api.create_tool_from_code(&request).await,
        },
        Effect::ScheduleNoticeDismiss { ticket, after } => {
            tokio::time::sleep(after).await;
            Event::NoticeExpired(ticket)
        }
    }
}
