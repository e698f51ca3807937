use leptos::prelude::*;

/// A formatted code snippet from a coding agent reply
#[component]
pub fn CodeBlock(code: String, language: Option<String>) -> impl IntoView {
    view! {
        <div class="mt-3 rounded-lg overflow-hidden border border-gray-700">
            <div class="bg-gray-700 text-gray-300 text-xs px-3 py-1 font-mono">
                {language.unwrap_or_else(|| "code".to_string())}
            </div>
            <pre class="bg-gray-900 text-gray-100 text-sm p-3 overflow-x-auto">
                <code class="font-mono">{code}</code>
            </pre>
        </div>
    }
}
