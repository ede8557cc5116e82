//! Error classification for catalog backend requests.
//! Gives the session a structured error it can turn into a status and a banner message.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified failure kinds the UI can act upon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete within the configured timeout
    Timeout,
    /// DNS, connect or TLS failure before a response arrived
    Network,
    /// HTTP 429
    RateLimited,
    /// HTTP 404 (unknown App ID, game without a schema)
    NotFound,
    /// HTTP 400/422, e.g. a query the backend refuses
    BadRequest,
    /// HTTP 5xx
    Server,
    /// The body was not the JSON shape we expect
    Decode,
    /// Generic/unknown error
    Unknown,
}

/// Structured error with the backend's human-readable detail, if it sent one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub status: Option<u16>,
    pub detail: Option<String>,
    pub raw_message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, raw_message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            detail: None,
            raw_message: raw_message.into(),
        }
    }

    /// Error carrying a backend detail string, the way the API reports refusals.
    pub fn with_detail(kind: FetchErrorKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind,
            status: None,
            raw_message: detail.clone(),
            detail: Some(detail),
        }
    }

    /// Classify a non-success HTTP response.
    /// The backend reports errors as `{"detail": "..."}`; anything else leaves `detail` empty.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            429 => FetchErrorKind::RateLimited,
            404 => FetchErrorKind::NotFound,
            400 | 422 => FetchErrorKind::BadRequest,
            408 | 504 => FetchErrorKind::Timeout,
            500..=599 => FetchErrorKind::Server,
            _ => FetchErrorKind::Unknown,
        };

        Self {
            kind,
            status: Some(status),
            detail: extract_detail(body),
            raw_message: format!("HTTP {}", status),
        }
    }

    pub fn from_transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FetchErrorKind::Timeout
        } else if err.is_decode() {
            FetchErrorKind::Decode
        } else if err.is_connect() || err.is_request() {
            FetchErrorKind::Network
        } else {
            FetchErrorKind::Unknown
        };

        Self {
            kind,
            status: err.status().map(|s| s.as_u16()),
            detail: None,
            raw_message: err.to_string(),
        }
    }

    pub fn from_decode(err: &serde_json::Error) -> Self {
        Self::new(FetchErrorKind::Decode, err.to_string())
    }

    /// Message for the error banner: the backend detail when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Whether re-issuing the same request has a reasonable chance of succeeding
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            FetchErrorKind::Timeout
                | FetchErrorKind::Network
                | FetchErrorKind::RateLimited
                | FetchErrorKind::Server
        )
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{:?}: {} ({})", self.kind, detail, self.raw_message),
            None => write!(f, "{:?}: {}", self.kind, self.raw_message),
        }
    }
}

impl std::error::Error for FetchError {}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        let err = FetchError::from_status(429, r#"{"detail": "Rate limited"}"#);
        assert_eq!(err.kind, FetchErrorKind::RateLimited);
        assert_eq!(err.detail.as_deref(), Some("Rate limited"));
        assert_eq!(err.user_message("Error searching games"), "Rate limited");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_not_found_detection() {
        let err = FetchError::from_status(404, r#"{"detail": "Game not found"}"#);
        assert_eq!(err.kind, FetchErrorKind::NotFound);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_missing_detail_uses_fallback() {
        let err = FetchError::from_status(502, "<html>Bad Gateway</html>");
        assert_eq!(err.kind, FetchErrorKind::Server);
        assert_eq!(err.detail, None);
        assert_eq!(
            err.user_message("Error loading achievements"),
            "Error loading achievements"
        );
    }

    #[test]
    fn test_structured_detail_is_not_a_message() {
        // Validation errors carry a list under `detail`.
        let body = r#"{"detail": [{"loc": ["query", "q"], "msg": "field required"}]}"#;
        let err = FetchError::from_status(422, body);
        assert_eq!(err.kind, FetchErrorKind::BadRequest);
        assert_eq!(err.detail, None);
    }

    #[test]
    fn test_blank_detail_is_ignored() {
        let err = FetchError::from_status(500, r#"{"detail": "   "}"#);
        assert_eq!(err.user_message("fallback"), "fallback");
    }
}
