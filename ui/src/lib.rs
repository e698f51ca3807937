use agent_studio::controller::Action;
use leptos::prelude::*;

mod api;
mod components;
mod studio;

use components::agent_creation_form::AgentCreationForm;
use components::chat_interface::ChatInterface;
use components::document_upload::DocumentUpload;
use components::sidebar::Sidebar;
use components::welcome_screen::WelcomeScreen;
use studio::Studio;

#[component]
pub fn App() -> impl IntoView {
    let studio = Studio::new();
    provide_context(studio);

    // Find the agent service, then load the agent list
    wasm_bindgen_futures::spawn_local(async move {
        studio.set_api(api::Api::discover().await);
        studio.dispatch(Action::Mount);
    });

    // Panels are rebuilt only when the screen changes, not on every edit
    let screen = Memo::new(move |_| studio.with(|s| s.screen.name()));

    view! {
        <div class="flex h-screen bg-gray-100">
            <Sidebar />

            // Main Content
            <div class="flex-1 flex flex-col overflow-hidden">
                <ErrorBanner />
                <div class="flex-1 overflow-y-auto">
                    {move || match screen.get() {
                        "creating" => view! { <AgentCreationForm /> }.into_any(),
                        "awaiting_document" => view! { <DocumentUpload /> }.into_any(),
                        "chatting" => view! { <ChatInterface /> }.into_any(),
                        _ => view! { <WelcomeScreen /> }.into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn ErrorBanner() -> impl IntoView {
    let studio = expect_context::<Studio>();

    move || {
        studio.with(|s| s.error.clone()).map(|message| view! {
            <div class="bg-red-50 border-b border-red-200 text-red-700 px-6 py-3 flex justify-between items-center">
                <span>{message}</span>
                <button
                    class="text-red-500 hover:text-red-700 font-bold"
                    on:click=move |_| studio.dispatch(Action::DismissError)
                >
                    "×"
                </button>
            </div>
        })
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(App);
}
