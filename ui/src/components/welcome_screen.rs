use agent_studio::controller::Action;
use agent_studio::domain::registry;
use leptos::prelude::*;

use crate::studio::Studio;

#[component]
pub fn WelcomeScreen() -> impl IntoView {
    let studio = expect_context::<Studio>();

    view! {
        <div class="p-8 max-w-5xl mx-auto">
            <h2 class="text-3xl font-bold mb-2">"Welcome to Agent Studio"</h2>
            <p class="text-gray-600 mb-8">
                "Pick an agent from the sidebar, or create a new one from one of these templates."
            </p>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                {registry().iter().map(|info| {
                    let id = info.id;
                    view! {
                        <div
                            class="bg-white rounded-lg shadow p-6 hover:shadow-lg transition-shadow cursor-pointer"
                            on:click=move |_| {
                                studio.dispatch(Action::SetDraftType(id));
                                studio.dispatch(Action::BeginCreate);
                            }
                        >
                            <div class="flex items-center gap-3 mb-3">
                                <span class="text-3xl">{info.icon}</span>
                                <h3 class="text-lg font-semibold">{info.name}</h3>
                            </div>
                            <p class="text-gray-600 text-sm mb-4">{info.description}</p>
                            <ul class="text-sm text-gray-500 space-y-1">
                                {info.features.unwrap_or_default().iter().map(|feature| view! {
                                    <li class="flex items-center gap-2">
                                        <span class="text-green-500">"✓"</span>
                                        {*feature}
                                    </li>
                                }).collect_view()}
                            </ul>
                        </div>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}
