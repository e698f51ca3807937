use agent_studio::controller::{Action, Session};
use agent_studio::domain::agent_type::CODING_LANGUAGES;
use agent_studio::domain::{CodingMode, Message, Role};
use leptos::prelude::*;

use crate::components::code_block::CodeBlock;
use crate::components::loading_spinner::LoadingSpinner;
use crate::studio::Studio;

#[component]
pub fn ChatInterface() -> impl IntoView {
    let studio = expect_context::<Studio>();

    // Reads one field of the session on screen
    fn session_field<T: PartialEq + Send + Sync + Default + 'static>(
        studio: Studio,
        f: impl Fn(&Session) -> T + Send + Sync + 'static,
    ) -> Memo<T> {
        Memo::new(move |_| studio.with(|s| s.session().map(&f).unwrap_or_default()))
    }

    let title = session_field(studio, |s| {
        format!("{} {}", s.agent.kind.info().icon, s.agent.name)
    });
    let document = session_field(studio, |s| s.document.clone());
    let is_coding = session_field(studio, |s| s.is_coding());
    let messages = session_field(studio, |s| s.messages.clone());
    let input = session_field(studio, |s| s.input.clone());
    let sending = session_field(studio, |s| s.is_sending());
    let mode = session_field(studio, |s| s.coding_mode);
    let language = session_field(studio, |s| s.language.clone());
    let placeholder = session_field(studio, |s| s.placeholder().to_string());
    let loading_message = session_field(studio, |s| s.loading_message().to_string());
    let languages = session_field(studio, |s| {
        let configured = s.agent.configuration.supported_languages();
        if configured.is_empty() {
            CODING_LANGUAGES.iter().map(|l| l.to_string()).collect()
        } else {
            configured.to_vec()
        }
    });

    let send = move || studio.dispatch(Action::SendMessage);
    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="flex flex-col h-full">
            // Header
            <div class="bg-white border-b px-6 py-4 flex justify-between items-center">
                <div>
                    <h2 class="text-xl font-bold">{move || title.get()}</h2>
                    {move || document.get().map(|name| view! {
                        <p class="text-xs text-gray-500">"Document: " {name}</p>
                    })}
                </div>
                <Show when=move || is_coding.get()>
                    <div class="flex items-center gap-4">
                        <div class="flex bg-gray-100 rounded-lg p-1">
                            {CodingMode::ALL.into_iter().map(|m| view! {
                                <button
                                    class=move || format!(
                                        "px-3 py-1 rounded text-sm font-medium transition-colors {}",
                                        if mode.get() == m { "bg-white shadow text-gray-900" } else { "text-gray-600 hover:text-gray-900" }
                                    )
                                    on:click=move |_| studio.dispatch(Action::SetCodingMode(m))
                                >
                                    {m.label()}
                                </button>
                            }).collect_view()}
                        </div>
                        <select
                            class="px-3 py-1 border border-gray-300 rounded-md text-sm"
                            on:change=move |ev| studio.dispatch(Action::SetLanguage(event_target_value(&ev)))
                        >
                            {move || languages.get().into_iter().map(|l| {
                                let selected = language.get() == l;
                                view! { <option value=l.clone() selected=selected>{l.clone()}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                </Show>
            </div>

            // Messages
            <div class="flex-1 overflow-y-auto p-6 space-y-4">
                {move || messages.get().into_iter().map(|message| view! { <MessageBubble message=message /> }).collect_view()}
                <Show when=move || sending.get()>
                    <LoadingSpinner message=Signal::derive(move || loading_message.get()) />
                </Show>
            </div>

            // Input
            <div class="bg-white border-t p-4 flex space-x-3">
                <textarea
                    rows=move || if is_coding.get() { "4" } else { "1" }
                    class="flex-1 px-4 py-2 border border-gray-300 rounded-xl shadow-sm focus:ring-2 focus:ring-blue-500 focus:border-blue-500 resize-none font-mono text-sm"
                    placeholder=move || placeholder.get()
                    prop:value=move || input.get()
                    on:input=move |ev| studio.dispatch(Action::EditInput(event_target_value(&ev)))
                    on:keydown=on_keydown
                />
                <button
                    class="px-4 py-2 bg-blue-600 text-white rounded-xl hover:bg-blue-700 disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                    on:click=move |_| send()
                    disabled=move || input.get().trim().is_empty()
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}

#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let is_user = message.role == Role::User;
    let time = message.timestamp.format("%H:%M").to_string();
    let language = message.language.clone();
    let code = message.code.clone().unwrap_or_default();

    view! {
        <div class=if is_user { "flex justify-end" } else { "flex justify-start" }>
            <div class=if is_user {
                "max-w-2xl bg-blue-600 text-white rounded-xl px-4 py-3"
            } else {
                "max-w-2xl bg-white shadow rounded-xl px-4 py-3"
            }>
                <p class="whitespace-pre-wrap">{message.content}</p>
                {code.into_iter().map(|snippet| view! {
                    <CodeBlock code=snippet language=language.clone() />
                }).collect_view()}
                <p class=if is_user { "text-xs text-blue-200 mt-1" } else { "text-xs text-gray-400 mt-1" }>
                    {time}
                    {message.error.filter(|e| *e).map(|_| " · error report")}
                </p>
            </div>
        </div>
    }
}
