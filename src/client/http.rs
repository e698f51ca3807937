use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::AgentApi;
use crate::domain::{
    form_value, mark_samples, Agent, AgentReply, CreateToolFromCodeRequest, CreateToolRequest,
    DocumentFile, ExecuteToolRequest, NewAgent, QueryContext, QueryResponse, Tool,
};
use crate::error::{ApiError, ApiResult};

/// reqwest-backed client for the agent service
///
/// No retries, no timeouts and no de-duplication: every call is exactly
/// one request, and concurrent calls resolve in network order.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn tool_url(&self, name: &str, suffix: &str) -> String {
        self.url(&format!("/tools/{}{}", urlencoding::encode(name), suffix))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> ApiResult<T> {
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        read_json(response).await
    }

    async fn post_form<T: DeserializeOwned>(&self, url: String, form: Form) -> ApiResult<T> {
        debug!("POST {} (multipart)", url);
        let response = self.client.post(&url).multipart(form).send().await?;
        read_json(response).await
    }

    async fn delete(&self, url: String) -> ApiResult<Value> {
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    async fn ask(&self, agent_id: i64, endpoint: &str, form: Form, sent: &str) -> ApiResult<QueryResponse> {
        let url = self.url(&format!("/agents/{}/{}", agent_id, endpoint));
        let reply: AgentReply = self.post_form(url, form).await?;
        Ok(QueryResponse::from_reply(reply, sent))
    }
}

/// Turn a response into `T`, or into the error its body describes
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!("Request failed ({}): {}", status, err);
        return Err(err);
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl AgentApi for HttpApiClient {
    async fn list_agents(&self) -> ApiResult<Vec<Agent>> {
        self.get_json(self.url("/agents/")).await
    }

    async fn create_agent(&self, agent: NewAgent) -> ApiResult<Agent> {
        let request = agent.into_request()?;
        self.post_json(self.url("/agents/"), &request).await
    }

    async fn delete_agent(&self, agent_id: i64) -> ApiResult<Value> {
        self.delete(self.url(&format!("/agents/{}", agent_id))).await
    }

    async fn upload_document(&self, agent_id: i64, file: DocumentFile) -> ApiResult<Value> {
        let url = self.url(&format!("/agents/{}/upload", agent_id));
        let part = Part::bytes(file.bytes).file_name(file.name);
        self.post_form(url, Form::new().part("file", part)).await
    }

    async fn query_agent(
        &self,
        agent_id: i64,
        query: &str,
        context: &QueryContext,
    ) -> ApiResult<QueryResponse> {
        let form = context
            .iter()
            .fold(Form::new().text("query", query.to_string()), |form, (key, value)| {
                form.text(key.clone(), form_value(value))
            });
        self.ask(agent_id, "query", form, query).await
    }

    async fn interact_with_agent(&self, agent_id: i64, message: &str) -> ApiResult<QueryResponse> {
        let form = Form::new().text("message", message.to_string());
        self.ask(agent_id, "interact", form, message).await
    }

    async fn list_tools(&self) -> ApiResult<Vec<Tool>> {
        let tools: Vec<Tool> = self.get_json(self.url("/tools")).await?;
        Ok(mark_samples(tools))
    }

    async fn get_tool(&self, name: &str) -> ApiResult<Tool> {
        let tool: Tool = self.get_json(self.tool_url(name, "")).await?;
        Ok(tool.mark_sample())
    }

    async fn create_tool(&self, request: &CreateToolRequest) -> ApiResult<Tool> {
        let tool: Tool = self.post_json(self.url("/tools"), request).await?;
        Ok(tool.mark_created())
    }

    async fn create_tool_from_code(&self, request: &CreateToolFromCodeRequest) -> ApiResult<Tool> {
        let tool: Tool = self.post_json(self.url("/tools/code"), request).await?;
        Ok(tool.mark_created())
    }

    async fn delete_tool(&self, name: &str) -> ApiResult<()> {
        self.delete(self.tool_url(name, "")).await.map(|_| ())
    }

    async fn execute_tool(&self, name: &str, parameters: Value) -> ApiResult<Value> {
        let body = ExecuteToolRequest { parameters };
        self.post_json(self.tool_url(name, "/execute"), &body).await
    }
}
