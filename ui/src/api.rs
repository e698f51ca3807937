//! Browser transport for the agent service
//!
//! Mirrors the native client: same endpoints, same error mapping and the
//! same response normalization from the shared domain crate.

use agent_studio::domain::{
    form_value, mark_samples, Agent, AgentReply, CreateToolFromCodeRequest, CreateToolRequest,
    DocumentFile, NewAgent, QueryContext, QueryResponse, Tool, DEFAULT_BASE_URL,
};
use agent_studio::error::{ApiError, ApiResult};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

/// Written by `agent-studio serve`; absent when the bundle is hosted elsewhere
const RUNTIME_CONFIG_URL: &str = "/studio.json";

#[derive(Debug, Deserialize)]
struct RuntimeConfig {
    api_base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Api {
    base_url: String,
}

impl Default for Api {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Api {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Client for the agent service named by the serving host, or the default
    pub async fn discover() -> Self {
        match fetch_runtime_config().await {
            Ok(config) => {
                log::info!("Agent service at {}", config.api_base_url);
                Self::new(config.api_base_url)
            }
            Err(e) => {
                log::warn!("No runtime config ({}), using {}", e, DEFAULT_BASE_URL);
                Self::default()
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_agents(&self) -> ApiResult<Vec<Agent>> {
        let response = Request::get(&self.url("/agents/")).send().await.map_err(network)?;
        read_json(response).await
    }

    pub async fn create_agent(&self, agent: NewAgent) -> ApiResult<Agent> {
        let request = agent.into_request()?;
        post_json(&self.url("/agents/"), &request).await
    }

    pub async fn upload_document(
        &self,
        agent_id: i64,
        file: DocumentFile,
    ) -> ApiResult<serde_json::Value> {
        let form = FormData::new().map_err(js_error)?;
        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let blob = Blob::new_with_u8_array_sequence(&parts).map_err(js_error)?;
        form.append_with_blob_and_filename("file", &blob, &file.name)
            .map_err(js_error)?;
        post_form(&self.url(&format!("/agents/{}/upload", agent_id)), form).await
    }

    pub async fn query_agent(
        &self,
        agent_id: i64,
        query: &str,
        context: &QueryContext,
    ) -> ApiResult<QueryResponse> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_str("query", query).map_err(js_error)?;
        for (key, value) in context {
            form.append_with_str(key, &form_value(value))
                .map_err(js_error)?;
        }
        let reply: AgentReply =
            post_form(&self.url(&format!("/agents/{}/query", agent_id)), form).await?;
        Ok(QueryResponse::from_reply(reply, query))
    }

    pub async fn list_tools(&self) -> ApiResult<Vec<Tool>> {
        let response = Request::get(&self.url("/tools")).send().await.map_err(network)?;
        let tools: Vec<Tool> = read_json(response).await?;
        Ok(mark_samples(tools))
    }

    pub async fn create_tool(&self, request: &CreateToolRequest) -> ApiResult<Tool> {
        let tool: Tool = post_json(&self.url("/tools"), request).await?;
        Ok(tool.mark_created())
    }

    pub async fn create_tool_from_code(
        &self,
        request: &CreateToolFromCodeRequest,
    ) -> ApiResult<Tool> {
        let tool: Tool = post_json(&self.url("/tools/code"), request).await?;
        Ok(tool.mark_created())
    }
}

async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    let response = Request::get(RUNTIME_CONFIG_URL)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    if !response.ok() {
        return Err(format!("status {}", response.status()));
    }
    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn post_json<T: Serialize, R: DeserializeOwned>(url: &str, body: &T) -> ApiResult<R> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(network)?;
    read_json(response).await
}

async fn post_form<R: DeserializeOwned>(url: &str, form: FormData) -> ApiResult<R> {
    let response = Request::post(url)
        .body(JsValue::from(form))
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(network)?;
    if !response.ok() {
        return Err(ApiError::from_response(status, &body));
    }
    Ok(serde_json::from_str(&body)?)
}

fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", e))
}
