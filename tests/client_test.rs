mod common;

use agent_studio::client::{AgentApi, HttpApiClient};
use agent_studio::domain::{
    AgentConfig, AgentStatus, AgentType, CreateToolFromCodeRequest, CreateToolRequest,
    DocumentFile, NewAgent, QueryContext,
};
use agent_studio::error::ApiError;
use axum::http::Method;
use chrono::Utc;
use common::StubService;
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_agents_normalizes_types() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url_with_slash());

    let agents = client.list_agents().await.unwrap();

    let kinds: Vec<AgentType> = agents.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![AgentType::Conversational, AgentType::Rag, AgentType::Coding]
    );
    assert_eq!(agents[1].status, AgentStatus::Active);
    assert_eq!(agents[2].status, AgentStatus::Inactive);
    assert_eq!(
        agents[0].configuration.prompt_template(),
        Some("Be brief. {input}")
    );
    assert_eq!(stub.recorder.last().path, "/agents/");
}

#[tokio::test]
async fn test_odd_configuration_does_not_fail_listing() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.variant_url("legacy"));

    let agents = client.list_agents().await.unwrap();

    let ids: Vec<i64> = agents.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(agents[1].kind, AgentType::ToolCalling);
    assert!(agents[1].configuration.tools().is_empty());
    assert_eq!(
        serde_json::to_value(&agents[1].configuration).unwrap(),
        json!({"tools": [{"name": "add", "description": "Add"}]})
    );
}

#[tokio::test]
async fn test_create_agent_sends_defaults() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let agent = client
        .create_agent(NewAgent::new("  Support  ", AgentType::Conversational))
        .await
        .unwrap();

    assert_eq!(agent.id, 10);
    assert_eq!(agent.name, "Support");
    assert_eq!(agent.status, AgentStatus::Active);
    assert_eq!(agent.configuration, AgentConfig::empty(AgentType::Conversational));

    let sent: Value = serde_json::from_str(&stub.recorder.last().body).unwrap();
    assert_eq!(
        sent,
        json!({
            "name": "Support",
            "type": "conversational",
            "status": "active",
            "configuration": {}
        })
    );
}

#[tokio::test]
async fn test_invalid_create_sends_nothing() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let err = client
        .create_agent(NewAgent {
            kind: Some(AgentType::Rag),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Validation("Name and type are required".into()));
    assert!(stub.recorder.all().is_empty());
}

#[tokio::test]
async fn test_query_sends_multipart_fields() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let mut context = QueryContext::new();
    context.insert("language".into(), json!("rust"));
    context.insert("mode".into(), json!("explain"));
    context.insert("strict".into(), json!(true));

    let before = Utc::now();
    let response = client.query_agent(3, "What does this do?", &context).await.unwrap();

    assert_eq!(response.response, "Here is the code");
    assert_eq!(response.message, "What does this do?");
    assert!(response.created_at >= before);
    assert_eq!(response.metadata["language"], "python");

    let request = stub.recorder.last();
    assert_eq!(request.path, "/agents/3/query");
    assert!(request.content_type.starts_with("multipart/form-data"));
    for (name, value) in [
        ("query", "What does this do?"),
        ("language", "rust"),
        ("mode", "explain"),
        ("strict", "true"),
    ] {
        let field = format!("name=\"{}\"\r\n\r\n{}\r\n", name, value);
        assert!(request.body.contains(&field), "missing field {}", name);
    }
}

#[tokio::test]
async fn test_interact_sends_message_field() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let response = client.interact_with_agent(1, "hi").await.unwrap();

    assert_eq!(response.response, "Hello from the agent");
    assert!(response.metadata.is_empty());
    let request = stub.recorder.last();
    assert_eq!(request.path, "/agents/1/interact");
    assert!(request.body.contains("name=\"message\"\r\n\r\nhi\r\n"));
}

#[tokio::test]
async fn test_upload_uses_file_field() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let result = client
        .upload_document(2, DocumentFile::new("notes.txt", b"some notes".to_vec()))
        .await
        .unwrap();

    assert_eq!(result["message"], "Document processed");
    let request = stub.recorder.last();
    assert!(request.body.contains("name=\"file\"; filename=\"notes.txt\""));
    assert!(request.body.contains("some notes"));
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let err = client
        .upload_document(404, DocumentFile::new("a.pdf", vec![0]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Agent not found");

    let err = client.get_tool("missing").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 404,
            detail: "Tool not found".into()
        }
    );
}

#[tokio::test]
async fn test_error_without_detail_is_generic() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let err = client
        .query_agent(500, "hello", &QueryContext::new())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Http { status: 500 });

    let err = client.delete_tool("extract_urls").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 500");
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let client = HttpApiClient::new("http://127.0.0.1:9");
    let err = client.list_agents().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn test_tool_listing_marks_samples() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let tools = client.list_tools().await.unwrap();

    let flags: Vec<(&str, bool)> = tools.iter().map(|t| (t.name.as_str(), t.is_sample)).collect();
    assert_eq!(flags, vec![("multiply", true), ("extract_urls", false)]);

    let tool = client.get_tool("add").await.unwrap();
    assert!(tool.is_sample);
    assert_eq!(tool.code.as_deref(), Some("def run(): pass"));
}

#[tokio::test]
async fn test_created_tools_are_never_samples() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let tool = client
        .create_tool(&CreateToolRequest::from_description("Add two numbers"))
        .await
        .unwrap();
    assert_eq!(tool.name, "add");
    assert!(!tool.is_sample);

    let sent: Value = serde_json::from_str(&stub.recorder.last().body).unwrap();
    assert_eq!(
        sent,
        json!({"description": "Add two numbers", "created_by": "user"})
    );

    let tool = client
        .create_tool_from_code(&CreateToolFromCodeRequest::new("multiply", "def multiply(a, b): return a * b"))
        .await
        .unwrap();
    assert_eq!(tool.name, "multiply");
    assert!(!tool.is_sample);
    assert_eq!(stub.recorder.last().path, "/tools/code");
}

#[tokio::test]
async fn test_execute_and_delete() {
    let stub = StubService::start().await;
    let client = HttpApiClient::new(stub.base_url.clone());

    let result = client
        .execute_tool("multiply", json!({"a": 2, "b": 3}))
        .await
        .unwrap();
    assert_eq!(result, json!({"result": 6}));
    let sent: Value = serde_json::from_str(&stub.recorder.last().body).unwrap();
    assert_eq!(sent, json!({"parameters": {"a": 2, "b": 3}}));

    let deleted = client.delete_agent(7).await.unwrap();
    assert_eq!(deleted["message"], "Agent 7 deleted");
    let request = stub.recorder.last();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/agents/7");
}
