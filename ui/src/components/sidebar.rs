use agent_studio::controller::{Action, Screen};
use agent_studio::domain::{registry, AgentType};
use leptos::prelude::*;

use crate::studio::Studio;

#[component]
pub fn Sidebar() -> impl IntoView {
    let studio = expect_context::<Studio>();

    let kind = Memo::new(move |_| studio.with(|s| s.draft.kind));
    let loading = Memo::new(move |_| studio.with(|s| s.agents_loading));
    let selected = Memo::new(move |_| {
        studio.with(|s| match &s.screen {
            Screen::AwaitingDocument(session) | Screen::Chatting(session) => Some(session.agent.id),
            _ => None,
        })
    });
    let agents = Memo::new(move |_| {
        let kind = kind.get();
        studio.with(|s| {
            s.agents
                .iter()
                .filter(|a| a.kind == kind)
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    view! {
        <div class="w-64 bg-gray-800 text-white p-4 flex flex-col">
            <h1 class="text-2xl font-bold mb-6">"Agent Studio"</h1>

            <button
                class="w-full bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded mb-6 flex items-center justify-center gap-2"
                on:click=move |_| studio.dispatch(Action::BeginCreate)
            >
                <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 4v16m8-8H4"/>
                </svg>
                "New Agent"
            </button>

            // Type filter; also the kind the creation form starts with
            <label class="text-xs uppercase tracking-wide text-gray-400 mb-2">"Agent type"</label>
            <div class="space-y-1 mb-6">
                {registry().iter().map(|info| {
                    let id = info.id;
                    view! {
                        <button
                            class=move || format!(
                                "w-full text-left p-2 rounded transition-colors flex items-center gap-2 {}",
                                if kind.get() == id { "bg-gray-700" } else { "hover:bg-gray-700" }
                            )
                            on:click=move |_| studio.dispatch(Action::SetDraftType(id))
                        >
                            <span>{info.icon}</span>
                            <span class="text-sm">{info.name}</span>
                        </button>
                    }
                }).collect_view()}
            </div>

            <label class="text-xs uppercase tracking-wide text-gray-400 mb-2">"Agents"</label>
            <nav class="space-y-1 flex-1 overflow-y-auto">
                <Show when=move || loading.get()>
                    <p class="text-sm text-gray-400">"Loading agents..."</p>
                </Show>
                <Show when=move || !loading.get() && agents.with(|a| a.is_empty())>
                    <p class="text-sm text-gray-500">{move || empty_label(kind.get())}</p>
                </Show>
                <For
                    each=move || agents.get()
                    key=|agent| agent.id
                    children=move |agent| {
                        let id = agent.id;
                        view! {
                            <button
                                class=move || format!(
                                    "w-full text-left block p-2 rounded transition-colors {}",
                                    if selected.get() == Some(id) { "bg-blue-600" } else { "hover:bg-gray-700" }
                                )
                                on:click=move |_| studio.dispatch(Action::SelectAgent(id))
                            >
                                {agent.name}
                            </button>
                        }
                    }
                />
            </nav>

            <div class="text-xs text-gray-500 mt-4">"No-code agent builder"</div>
        </div>
    }
}

fn empty_label(kind: AgentType) -> String {
    format!("No {} yet", kind.info().name.to_lowercase())
}
