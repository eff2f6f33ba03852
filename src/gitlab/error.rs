use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Failure of a GitLab API call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// GitLab answered with a non-success status code
    #[error("{method} {path}: {status} {message}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        message: String,
    },

    /// The request never produced a response (connect failure, timeout, TLS)
    #[error("request to GitLab failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape
    #[error("failed to decode GitLab response: {0}")]
    Decode(#[from] serde_json::Error),

    /// GraphQL endpoint answered 200 but reported errors in the body
    #[error("GraphQL error: {0}")]
    GraphQL(String),
}

impl ApiError {
    /// Builds a status error, extracting GitLab's `message` or `error` field from the body.
    pub fn from_response(method: Method, path: &str, status: StatusCode, body: &[u8]) -> Self {
        let message = extract_error_message(body);
        if status.is_server_error() {
            tracing::error!("GitLab API server error ({}) for {} {}: {}", status, method, path, message);
        } else {
            tracing::debug!("GitLab API client error ({}) for {} {}: {}", status, method, path, message);
        }
        Self::Status {
            method,
            path: path.to_string(),
            status,
            message,
        }
    }

    /// HTTP status of the failed call, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(status.as_u16()),
            Self::Transport(error) => error.status().map(|status| status.as_u16()),
            Self::Decode(_) | Self::GraphQL(_) => None,
        }
    }
}

fn extract_error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).trim().to_string();
    };

    let field = value.get("message").or_else(|| value.get("error"));
    match field {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message(br#"{"message":"404 Project Not Found"}"#),
            "404 Project Not Found"
        );
        assert_eq!(
            extract_error_message(br#"{"error":"insufficient_scope"}"#),
            "insufficient_scope"
        );
        assert_eq!(
            extract_error_message(br#"{"message":{"title":["can't be blank"]}}"#),
            r#"{"title":["can't be blank"]}"#
        );
        assert_eq!(extract_error_message(b"Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_status_error_display_and_code() {
        let error = ApiError::from_response(
            Method::GET,
            "/projects/1/issues/7",
            StatusCode::NOT_FOUND,
            br#"{"message":"404 Not found"}"#,
        );
        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.to_string(),
            "GET /projects/1/issues/7: 404 Not Found 404 Not found"
        );
        assert_eq!(ApiError::GraphQL("boom".to_string()).status(), None);
    }
}
