//! Error types shared by the API clients and the controller

use thiserror::Error;

/// Errors that can occur while talking to the agent service
///
/// Every variant renders as the single line shown in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected locally, nothing was sent
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response carrying a `{"detail": ...}` body
    #[error("{detail}")]
    Server { status: u16, detail: String },

    /// Non-2xx response without a readable body
    #[error("Request failed with status {status}")]
    Http { status: u16 },

    /// The request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// The response did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Build the error for a failed response from its status and raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            detail: serde_json::Value,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => ApiError::Server { status, detail },
            // FastAPI validation failures put a list under `detail`
            Ok(ErrorBody { detail }) if !detail.is_null() => ApiError::Server {
                status,
                detail: detail.to_string(),
            },
            _ => ApiError::Http { status },
        }
    }

    /// True when the error was raised before any request was made
    pub fn is_local(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_connect() {
            ApiError::Network(format!("Connection error: {}", err))
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type alias for agent service calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_surfaced() {
        let err = ApiError::from_response(404, r#"{"detail": "Agent 7 not found"}"#);
        assert_eq!(
            err,
            ApiError::Server {
                status: 404,
                detail: "Agent 7 not found".to_string()
            }
        );
        assert_eq!(err.to_string(), "Agent 7 not found");
    }

    #[test]
    fn test_unparseable_body_is_generic() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err, ApiError::Http { status: 502 });
        assert_eq!(err.to_string(), "Request failed with status 502");

        let err = ApiError::from_response(500, "");
        assert_eq!(err, ApiError::Http { status: 500 });
    }

    #[test]
    fn test_structured_detail() {
        let err = ApiError::from_response(422, r#"{"detail": [{"msg": "field required"}]}"#);
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn test_validation_is_local() {
        assert!(ApiError::validation("Name is required").is_local());
        assert!(!ApiError::Http { status: 500 }.is_local());
    }
}
