use agent_studio::controller::Action;
use agent_studio::domain::Tool;
use leptos::prelude::*;

use crate::components::loading_spinner::LoadingSpinner;
use crate::studio::Studio;

#[derive(Clone, Copy, PartialEq)]
enum CreateMode {
    Description,
    Code,
}

/// Tool selection and creation, nested in the agent-creation form
#[component]
pub fn ToolManager() -> impl IntoView {
    let studio = expect_context::<Studio>();

    let tools = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.tool_manager.tools.clone()).unwrap_or_default())
    });
    let loading = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.tool_manager.loading).unwrap_or(false))
    });
    let notice = Memo::new(move |_| {
        studio.with(|s| {
            s.creation()
                .and_then(|c| c.tool_manager.notice.as_ref())
                .map(|n| n.text.clone())
        })
    });
    let selected_count = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.selected_tools.len()).unwrap_or(0))
    });

    view! {
        <div class="p-8 max-w-4xl mx-auto">
            <div class="flex justify-between items-center mb-6">
                <h2 class="text-2xl font-bold">"Tools"</h2>
                <button
                    class="px-4 py-2 text-gray-700 border border-gray-300 rounded hover:bg-gray-50"
                    on:click=move |_| studio.dispatch(Action::CloseToolManager)
                >
                    {move || format!("Back ({} selected)", selected_count.get())}
                </button>
            </div>

            {move || notice.get().map(|text| view! {
                <div class="bg-green-50 border border-green-200 text-green-800 rounded p-3 mb-4">
                    {text}
                </div>
            })}

            <div class="bg-white rounded-lg shadow mb-6">
                {move || {
                    if loading.get() {
                        view! {
                            <LoadingSpinner message=Signal::derive(|| "Loading tools...".to_string()) />
                        }.into_any()
                    } else if tools.get().is_empty() {
                        view! {
                            <p class="p-6 text-gray-500">"No tools available. Create one below."</p>
                        }.into_any()
                    } else {
                        view! {
                            <ul class="divide-y divide-gray-200">
                                <For
                                    each=move || tools.get()
                                    key=|tool| tool.name.clone()
                                    children=move |tool| view! { <ToolRow tool=tool /> }
                                />
                            </ul>
                        }.into_any()
                    }
                }}
            </div>

            <CreateToolForm />
        </div>
    }
}

#[component]
fn ToolRow(tool: Tool) -> impl IntoView {
    let studio = expect_context::<Studio>();
    let name = tool.name.clone();
    let selected = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.is_selected(&name)).unwrap_or(false))
    });
    let selection = tool.selection();

    view! {
        <li class="px-6 py-4 flex items-start gap-3">
            <input
                type="checkbox"
                class="mt-1 h-4 w-4 text-blue-600 rounded"
                prop:checked=move || selected.get()
                on:change=move |_| studio.dispatch(Action::ToggleTool(selection.clone()))
            />
            <div class="flex-1">
                <div class="flex items-center gap-2">
                    <span class="font-medium text-gray-900">{tool.name.clone()}</span>
                    {tool.is_sample.then(|| view! {
                        <span class="text-xs bg-gray-100 text-gray-600 px-2 py-0.5 rounded">"Sample"</span>
                    })}
                </div>
                <p class="text-sm text-gray-500">{tool.description.clone()}</p>
            </div>
        </li>
    }
}

#[component]
fn CreateToolForm() -> impl IntoView {
    let studio = expect_context::<Studio>();
    let (mode, set_mode) = signal(CreateMode::Description);
    let (description, set_description) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (code, set_code) = signal(String::new());

    let creating = Memo::new(move |_| {
        studio.with(|s| s.creation().map(|c| c.tool_manager.creating).unwrap_or(false))
    });

    let submit = move |_| {
        let action = match mode.get_untracked() {
            CreateMode::Description => {
                let code = code.get_untracked();
                Action::CreateTool {
                    description: description.get_untracked(),
                    code: (!code.trim().is_empty()).then_some(code),
                }
            }
            CreateMode::Code => Action::CreateToolFromCode {
                name: name.get_untracked(),
                code: code.get_untracked(),
            },
        };
        studio.dispatch(action);
        // Fields are kept when validation rejected the request
        if creating.get_untracked() {
            set_description.set(String::new());
            set_name.set(String::new());
            set_code.set(String::new());
        }
    };

    let tab_class = move |tab: CreateMode| {
        if mode.get() == tab {
            "px-3 py-1 rounded bg-blue-600 text-white"
        } else {
            "px-3 py-1 rounded bg-gray-100 text-gray-700 hover:bg-gray-200"
        }
    };

    view! {
        <div class="bg-white rounded-lg shadow p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h3 class="text-lg font-semibold">"Create Tool"</h3>
                <div class="flex gap-2 text-sm">
                    <button
                        class=move || tab_class(CreateMode::Description)
                        on:click=move |_| set_mode.set(CreateMode::Description)
                    >
                        "From description"
                    </button>
                    <button
                        class=move || tab_class(CreateMode::Code)
                        on:click=move |_| set_mode.set(CreateMode::Code)
                    >
                        "From code"
                    </button>
                </div>
            </div>

            {move || match mode.get() {
                CreateMode::Description => view! {
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">"Description"</label>
                        <textarea
                            rows="3"
                            class="w-full px-3 py-2 border border-gray-300 rounded-md shadow-sm"
                            placeholder="Extract all URLs from a piece of text"
                            prop:value=move || description.get()
                            on:input=move |ev| set_description.set(event_target_value(&ev))
                        />
                    </div>
                }.into_any(),
                CreateMode::Code => view! {
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">"Name"</label>
                        <input
                            type="text"
                            class="w-full px-3 py-2 border border-gray-300 rounded-md shadow-sm"
                            placeholder="extract_urls"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </div>
                }.into_any(),
            }}

            <div>
                <label class="block text-sm font-medium text-gray-700 mb-1">
                    {move || match mode.get() {
                        CreateMode::Description => "Code (optional)",
                        CreateMode::Code => "Code",
                    }}
                </label>
                <textarea
                    rows="8"
                    class="w-full px-3 py-2 border border-gray-300 rounded-md shadow-sm font-mono text-sm"
                    prop:value=move || code.get()
                    on:input=move |ev| set_code.set(event_target_value(&ev))
                />
            </div>

            <div class="flex justify-end">
                <button
                    class="px-4 py-2 bg-green-600 text-white rounded hover:bg-green-700 disabled:opacity-50"
                    on:click=submit
                    disabled=move || creating.get()
                >
                    {move || if creating.get() { "Creating..." } else { "Create Tool" }}
                </button>
            </div>
        </div>
    }
}
