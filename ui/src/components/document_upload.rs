use agent_studio::controller::Action;
use agent_studio::domain::{AgentType, DocumentFile};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::components::loading_spinner::LoadingSpinner;
use crate::studio::Studio;

/// Accept list for the file picker, from the registry
fn accept_list() -> String {
    AgentType::Rag
        .info()
        .supported_formats
        .unwrap_or_default()
        .join(",")
}

async fn read_file(file: web_sys::File) -> Result<DocumentFile, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(DocumentFile::new(file.name(), bytes))
}

#[component]
pub fn DocumentUpload() -> impl IntoView {
    let studio = expect_context::<Studio>();
    let (read_error, set_read_error) = signal(Option::<String>::None);

    let processing = Memo::new(move |_| {
        studio.with(|s| s.session().map(|x| x.processing_document).unwrap_or(false))
    });
    let agent_name = Memo::new(move |_| {
        studio.with(|s| s.session().map(|x| x.agent.name.clone()).unwrap_or_default())
    });

    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        input.set_value("");
        set_read_error.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            match read_file(file).await {
                Ok(document) => studio.dispatch(Action::UploadDocument(document)),
                Err(e) => set_read_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="p-8 max-w-2xl mx-auto">
            <h2 class="text-2xl font-bold mb-2">{move || agent_name.get()}</h2>
            <p class="text-gray-600 mb-6">
                "Upload a document to start asking questions about it."
            </p>

            <div class="bg-white rounded-lg shadow p-8 border-2 border-dashed border-gray-300 text-center">
                {move || if processing.get() {
                    view! {
                        <div class="flex justify-center">
                            <LoadingSpinner message=Signal::derive(|| "Processing document...".to_string()) />
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <label class="cursor-pointer">
                            <svg class="w-12 h-12 mx-auto text-gray-400 mb-3" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M7 16a4 4 0 01-.88-7.903A5 5 0 1115.9 6L16 6a5 5 0 011 9.9M15 13l-3-3m0 0l-3 3m3-3v12"/>
                            </svg>
                            <span class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded">"Choose a file"</span>
                            <input type="file" class="hidden" accept=accept_list() on:change=on_change />
                        </label>
                    }.into_any()
                }}
                <p class="text-xs text-gray-500 mt-4">
                    "Supported formats: " {accept_list().replace(',', ", ")}
                </p>
            </div>

            {move || read_error.get().map(|e| view! {
                <p class="text-red-600 text-sm mt-4">{e}</p>
            })}
        </div>
    }
}
