//! Stub agent service for integration tests
//!
//! Answers the endpoints the client uses with canned bodies and records
//! every request it receives.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub content_type: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: uri.path().to_string(),
            content_type,
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }

    pub fn all(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.all().pop().expect("no request recorded")
    }
}

pub struct StubService {
    pub addr: SocketAddr,
    pub base_url: String,
    pub recorder: Recorder,
}

impl StubService {
    pub async fn start() -> Self {
        let recorder = Recorder::default();
        let app = Router::new()
            .route("/agents/", get(list_agents).post(create_agent))
            .route("/agents/:id", axum::routing::delete(delete_agent))
            .route("/agents/:id/upload", post(upload))
            .route("/agents/:id/query", post(query))
            .route("/agents/:id/interact", post(query))
            .route("/tools", get(list_tools).post(create_tool))
            .route("/tools/code", post(create_tool))
            .route("/tools/:name", get(get_tool).delete(delete_tool))
            .route("/tools/:name/execute", post(execute_tool))
            // Alternate services under a path prefix, used as base URLs
            .route("/legacy/agents/", get(list_legacy_agents))
            .route("/broken/agents/", get(fail_agents).post(create_agent))
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubService {
            addr,
            base_url: format!("http://{}", addr),
            recorder,
        }
    }

    /// Base URL of the service variant mounted under `prefix`
    pub fn variant_url(&self, prefix: &str) -> String {
        format!("{}/{}", self.base_url, prefix)
    }

    /// Base URL with a trailing slash, as users tend to configure it
    pub fn base_url_with_slash(&self) -> String {
        format!("{}/", self.base_url)
    }
}

pub fn agents_body() -> Value {
    json!([
        {
            "id": 1,
            "name": "Helper",
            "type": "CONVERSATIONAL",
            "status": "active",
            "configuration": {"prompt_template": "Be brief. {input}"}
        },
        {
            "id": 2,
            "name": "Docs",
            "type": "Rag",
            "configuration": {"supported_formats": [".pdf", ".txt"]}
        },
        {
            "id": 3,
            "name": "Coder",
            "type": "coding",
            "status": "inactive",
            "configuration": {"supported_languages": ["python", "rust"]}
        }
    ])
}

pub fn tools_body() -> Value {
    json!([
        {
            "name": "multiply",
            "description": "Multiply two numbers",
            "created_by": "system",
            "created_at": "2024-05-01T10:00:00",
            "is_sample": false
        },
        {
            "name": "extract_urls",
            "description": "Extract URLs from text",
            "created_by": "user",
            "created_at": "2024-05-02T10:00:00",
            "is_sample": false
        }
    ])
}

async fn list_agents(State(rec): State<Recorder>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    rec.record(Method::GET, &uri, &headers, &[]);
    Json(agents_body())
}

/// Agents stored by older versions of the service
async fn list_legacy_agents(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    rec.record(Method::GET, &uri, &headers, &[]);
    Json(json!([
        {"id": 1, "name": "Helper", "type": "conversational", "configuration": {}},
        {
            "id": 2,
            "name": "Calculator",
            "type": "TOOL_CALLING",
            "configuration": {"tools": [{"name": "add", "description": "Add"}]}
        }
    ]))
}

async fn fail_agents(State(rec): State<Recorder>, uri: Uri, headers: HeaderMap) -> Response {
    rec.record(Method::GET, &uri, &headers, &[]);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({"detail": "Agent store unavailable"})),
    )
        .into_response()
}

async fn create_agent(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    rec.record(Method::POST, &uri, &headers, &body);
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "bad body"})))
            .into_response();
    };
    Json(json!({
        "id": 10,
        "name": request["name"],
        "type": request["type"],
        "status": request["status"],
        "configuration": request["configuration"]
    }))
    .into_response()
}

async fn delete_agent(
    State(rec): State<Recorder>,
    Path(id): Path<i64>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    rec.record(Method::DELETE, &uri, &headers, &[]);
    Json(json!({"message": format!("Agent {} deleted", id)})).into_response()
}

async fn upload(
    State(rec): State<Recorder>,
    Path(id): Path<i64>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    rec.record(Method::POST, &uri, &headers, &body);
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Agent not found"})))
            .into_response();
    }
    Json(json!({"message": "Document processed", "chunks": 3})).into_response()
}

async fn query(
    State(rec): State<Recorder>,
    Path(id): Path<i64>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    rec.record(Method::POST, &uri, &headers, &body);
    match id {
        3 => Json(json!({
            "response": "Here is the code",
            "metadata": {"language": "python", "formatted_code": ["print('hi')"]}
        }))
        .into_response(),
        500 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
        _ => Json(json!({"response": "Hello from the agent"})).into_response(),
    }
}

async fn list_tools(State(rec): State<Recorder>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    rec.record(Method::GET, &uri, &headers, &[]);
    Json(tools_body())
}

async fn get_tool(
    State(rec): State<Recorder>,
    Path(name): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    rec.record(Method::GET, &uri, &headers, &[]);
    if name == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Tool not found"})))
            .into_response();
    }
    Json(json!({"name": name, "description": "A tool", "code": "def run(): pass"})).into_response()
}

async fn create_tool(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    rec.record(Method::POST, &uri, &headers, &body);
    let request: Value = serde_json::from_slice(&body).unwrap_or_default();
    let name = request["name"].as_str().unwrap_or("add").to_string();
    // The server claims a sample; created tools must not be reported as one
    Json(json!({
        "name": name,
        "description": request["description"].as_str().unwrap_or("Generated"),
        "created_by": request["created_by"],
        "created_at": "2024-06-01T12:00:00",
        "is_sample": true
    }))
    .into_response()
}

async fn delete_tool(State(rec): State<Recorder>, uri: Uri, headers: HeaderMap) -> Response {
    rec.record(Method::DELETE, &uri, &headers, &[]);
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response()
}

async fn execute_tool(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    rec.record(Method::POST, &uri, &headers, &body);
    Json(json!({"result": 6}))
}
