//! Client error model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// Non-2xx response; `detail` carries the server's explanation when the
    /// body had one.
    #[error("request failed with status {status}")]
    Http { status: u16, detail: Option<String> },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// The one string shown to users: the server's `detail` when present,
    /// otherwise the error's own description, otherwise "Unknown error".
    pub fn message(&self) -> String {
        if let ClientError::Http {
            detail: Some(detail),
            ..
        } = self
        {
            if !detail.trim().is_empty() {
                return detail.clone();
            }
        }
        let described = self.to_string();
        if described.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            described
        }
    }
}

/// Pull a human-readable `detail` out of an error body. FastAPI-style
/// backends send `{"detail": "..."}`; structured details (validation error
/// arrays) are flattened to their JSON text.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_server_detail() {
        let err = ClientError::Http {
            status: 403,
            detail: Some("Reviewer role required".to_string()),
        };
        assert_eq!(err.message(), "Reviewer role required");
    }

    #[test]
    fn message_falls_back_to_status() {
        let err = ClientError::Http {
            status: 500,
            detail: None,
        };
        assert_eq!(err.message(), "request failed with status 500");

        let blank = ClientError::Http {
            status: 500,
            detail: Some("   ".to_string()),
        };
        assert_eq!(blank.message(), "request failed with status 500");
    }

    #[test]
    fn extract_detail_handles_shapes() {
        assert_eq!(
            extract_detail(r#"{"detail": "Verse not found"}"#).as_deref(),
            Some("Verse not found")
        );
        assert_eq!(extract_detail(r#"{"detail": null}"#), None);
        assert_eq!(extract_detail(r#"{"message": "other"}"#), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
        // Structured validation details survive as JSON text.
        let detail = extract_detail(r#"{"detail": [{"loc": ["number_manual"]}]}"#).unwrap();
        assert!(detail.contains("number_manual"));
    }
}
