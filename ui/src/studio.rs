//! Controller wiring for the browser
//!
//! The controller lives in a signal. Components read the state through
//! [`Studio::with`] and report intent with [`Studio::dispatch`]; effects run
//! on `spawn_local` and feed their completions back into the controller.

use agent_studio::controller::{Action, AppState, Controller, Effect, Event};
use leptos::prelude::*;

use crate::api::Api;

#[derive(Clone, Copy)]
pub struct Studio {
    controller: RwSignal<Controller>,
    api: StoredValue<Api>,
}

impl Studio {
    pub fn new() -> Self {
        Self {
            controller: RwSignal::new(Controller::new()),
            api: StoredValue::new(Api::default()),
        }
    }

    /// Point the transport at another agent service
    pub fn set_api(&self, api: Api) {
        self.api.set_value(api);
    }

    /// Read the state, tracking it in the surrounding reactive scope
    pub fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        self.controller.with(|c| f(c.state()))
    }

    pub fn dispatch(&self, action: Action) {
        let effects = self
            .controller
            .try_update(|c| c.dispatch(action))
            .unwrap_or_default();
        self.run(effects);
    }

    fn handle(&self, event: Event) {
        let effects = self
            .controller
            .try_update(|c| c.handle(event))
            .unwrap_or_default();
        self.run(effects);
    }

    fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            let studio = *self;
            wasm_bindgen_futures::spawn_local(async move {
                let api = studio.api.get_value();
                let event = perform(&api, effect).await;
                studio.handle(event);
            });
        }
    }
}

async fn perform(api: &Api, effect: Effect) -> Event {
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
            gloo_timers::future::sleep(after).await;
            Event::NoticeExpired(ticket)
        }
    }
}
