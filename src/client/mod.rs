//! Client side of the agent service HTTP API
//!
//! `AgentApi` is the port the session runner and the CLI talk to;
//! `HttpApiClient` is the reqwest implementation used in production.

mod http;

pub use http::HttpApiClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    Agent, CreateToolFromCodeRequest, CreateToolRequest, DocumentFile, NewAgent, QueryContext,
    QueryResponse, Tool,
};
use crate::error::ApiResult;

pub use crate::domain::DEFAULT_BASE_URL;

/// Operations offered by the agent service
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// List all agents, kinds normalized to lower case
    async fn list_agents(&self) -> ApiResult<Vec<Agent>>;

    /// Create an agent; fails locally when name or type is missing
    async fn create_agent(&self, agent: NewAgent) -> ApiResult<Agent>;

    async fn delete_agent(&self, agent_id: i64) -> ApiResult<Value>;

    /// Upload a document for a rag agent; the server body is returned as is
    async fn upload_document(&self, agent_id: i64, file: DocumentFile) -> ApiResult<Value>;

    /// Ask an agent a question, with extra form fields taken from `context`
    async fn query_agent(
        &self,
        agent_id: i64,
        query: &str,
        context: &QueryContext,
    ) -> ApiResult<QueryResponse>;

    async fn interact_with_agent(&self, agent_id: i64, message: &str) -> ApiResult<QueryResponse>;

    /// List tools, flagging the built-in samples
    async fn list_tools(&self) -> ApiResult<Vec<Tool>>;

    async fn get_tool(&self, name: &str) -> ApiResult<Tool>;

    /// Create a tool from a description; never a sample
    async fn create_tool(&self, request: &CreateToolRequest) -> ApiResult<Tool>;

    /// Create a tool from source code; never a sample
    async fn create_tool_from_code(&self, request: &CreateToolFromCodeRequest) -> ApiResult<Tool>;

    async fn delete_tool(&self, name: &str) -> ApiResult<()>;

    async fn execute_tool(&self, name: &str, parameters: Value) -> ApiResult<Value>;
}
