use agent_studio::controller::Action;
use agent_studio::domain::{registry, AgentConfig, AgentType};
use leptos::prelude::*;

use crate::components::tool_manager::ToolManager;
use crate::studio::Studio;

#[component]
pub fn AgentCreationForm() -> impl IntoView {
    let studio = expect_context::<Studio>();

    let show_tool_manager = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.show_tool_manager).unwrap_or(false))
    });

    move || {
        if show_tool_manager.get() {
            view! { <ToolManager /> }.into_any()
        } else {
            view! { <CreationForm /> }.into_any()
        }
    }
}

#[component]
fn CreationForm() -> impl IntoView {
    let studio = expect_context::<Studio>();

    let name = Memo::new(move |_| studio.with(|s| s.draft.name.clone()));
    let kind = Memo::new(move |_| studio.with(|s| s.draft.kind));
    let prompt_template = Memo::new(move |_| {
        studio.with(|s| s.draft.configuration.prompt_template().unwrap_or_default().to_string())
    });
    let submitting = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.submitting).unwrap_or(false))
    });

    view! {
        <div class="p-8 max-w-3xl mx-auto">
            <h2 class="text-2xl font-bold mb-6">"Create Agent"</h2>

            <div class="bg-white rounded-lg shadow p-6 space-y-5">
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">"Name"</label>
                    <input
                        type="text"
                        class="w-full px-3 py-2 border border-gray-300 rounded-md shadow-sm focus:ring-blue-500 focus:border-blue-500"
                        placeholder="My agent"
                        prop:value=move || name.get()
                        on:input=move |ev| studio.dispatch(Action::SetDraftName(event_target_value(&ev)))
                    />
                </div>

                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">"Type"</label>
                    <select
                        class="w-full px-3 py-2 border border-gray-300 rounded-md shadow-sm focus:ring-blue-500 focus:border-blue-500"
                        on:change=move |ev| {
                            if let Ok(kind) = event_target_value(&ev).parse::<AgentType>() {
                                studio.dispatch(Action::SetDraftType(kind));
                            }
                        }
                    >
                        {registry().iter().map(|info| {
                            let id = info.id;
                            view! {
                                <option value=id.as_str() selected=move || kind.get() == id>
                                    {info.icon} " " {info.name}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                    <p class="text-sm text-gray-500 mt-1">{move || kind.get().info().description}</p>
                </div>

                {move || match kind.get() {
                    AgentType::Conversational => view! {
                        <div>
                            <label class="block text-sm font-medium text-gray-700 mb-1">"Prompt template"</label>
                            <textarea
                                rows="4"
                                class="w-full px-3 py-2 border border-gray-300 rounded-md shadow-sm font-mono text-sm"
                                prop:value=move || prompt_template.get()
                                on:input=move |ev| studio.dispatch(Action::SetDraftPromptTemplate(event_target_value(&ev)))
                            />
                            <p class="text-xs text-gray-500 mt-1">"{input} is replaced by the user's message."</p>
                        </div>
                    }.into_any(),
                    AgentType::Rag => view! { <RagSettings /> }.into_any(),
                    AgentType::ToolCalling => view! { <SelectedTools /> }.into_any(),
                    AgentType::Coding => view! { <CodingSettings /> }.into_any(),
                }}

                <div class="flex justify-end gap-3 pt-2">
                    <button
                        class="px-4 py-2 text-gray-700 border border-gray-300 rounded hover:bg-gray-50"
                        on:click=move |_| studio.dispatch(Action::CancelCreate)
                    >
                        "Cancel"
                    </button>
                    <button
                        class="px-4 py-2 bg-blue-600 text-white rounded hover:bg-blue-700 disabled:opacity-50"
                        on:click=move |_| studio.dispatch(Action::SubmitCreate)
                        disabled=move || submitting.get()
                    >
                        {move || if submitting.get() { "Creating..." } else { "Create Agent" }}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn RagSettings() -> impl IntoView {
    let studio = expect_context::<Studio>();
    let formats = Memo::new(move |_| {
        studio.with(|s| match &s.draft.configuration {
            AgentConfig::Rag(c) => c.supported_formats.join(", "),
            _ => String::new(),
        })
    });

    view! {
        <div class="text-sm text-gray-600">
            <span class="font-medium text-gray-700">"Supported formats: "</span>
            {move || formats.get()}
        </div>
    }
}

#[component]
fn CodingSettings() -> impl IntoView {
    let studio = expect_context::<Studio>();
    let languages = Memo::new(move |_| {
        studio.with(|s| s.draft.configuration.supported_languages().join(", "))
    });

    view! {
        <div class="text-sm text-gray-600 space-y-1">
            <p>
                <span class="font-medium text-gray-700">"Languages: "</span>
                {move || languages.get()}
            </p>
            <p>
                <span class="font-medium text-gray-700">"Features: "</span>
                {AgentType::Coding.info().features.unwrap_or_default().join(", ")}
            </p>
        </div>
    }
}

#[component]
fn SelectedTools() -> impl IntoView {
    let studio = expect_context::<Studio>();
    let selected = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.selected_tools.clone()).unwrap_or_default())
    });

    view! {
        <div>
            <div class="flex justify-between items-center mb-2">
                <label class="block text-sm font-medium text-gray-700">"Tools"</label>
                <button
                    class="text-sm bg-green-500 hover:bg-green-600 text-white px-3 py-1 rounded"
                    on:click=move |_| studio.dispatch(Action::OpenToolManager)
                >
                    "Manage Tools"
                </button>
            </div>
            {move || {
                let tools = selected.get();
                if tools.is_empty() {
                    view! {
                        <p class="text-sm text-gray-500">"No tools selected yet."</p>
                    }.into_any()
                } else {
                    view! {
                        <div class="flex flex-wrap gap-2">
                            {tools.into_iter().map(|tool| {
                                let name = tool.name.clone();
                                view! {
                                    <span class="inline-flex items-center gap-1 bg-blue-100 text-blue-800 text-sm px-2 py-1 rounded">
                                        {name}
                                        <button
                                            class="text-blue-500 hover:text-blue-700"
                                            on:click=move |_| studio.dispatch(Action::ToggleTool(tool.clone()))
                                        >
                                            "×"
                                        </button>
                                    </span>
                                }
                            }).collect_view()}
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
