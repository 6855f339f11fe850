use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::FerretError;

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Error wrapper for API handlers
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// A search failed on malformed index bytes; reported as 404.
    SearchFailed(FerretError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::SearchFailed(err) => {
                (StatusCode::NOT_FOUND, "search_failed", err.to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        let body = ErrorResponse::new(error_type, message);
        (status, Json(body)).into_response()
    }
}

/// Decoded query-string pairs with per-parameter multiplicity rules:
/// `q` and `l` may appear at most once, while repeated `ids` occurrences
/// concatenate.
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
            .map_err(|e| ApiError::BadRequest(format!("malformed query string: {e}")))?;
        Ok(Self { pairs })
    }

    /// The value of a parameter that must not repeat.
    pub fn unique(&self, name: &str) -> Result<Option<&str>, ApiError> {
        let mut values = self.pairs.iter().filter(|(k, _)| k == name);
        let first = values.next();
        if values.next().is_some() {
            return Err(ApiError::BadRequest(format!(
                "parameter '{name}' passed more than once"
            )));
        }
        Ok(first.map(|(_, v)| v.as_str()))
    }

    /// All occurrences of a parameter joined with spaces; `None` when it
    /// never appears.
    pub fn concatenated(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(" "))
        }
    }
}

/// Parse the numeric `l` parameter: absent or negative means unlimited.
pub fn parse_limit(value: Option<&str>) -> Result<Option<usize>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let parsed: i64 = raw.parse().map_err(|_| {
                ApiError::BadRequest(format!("invalid value for parameter 'l': '{raw}'"))
            })?;
            if parsed < 0 {
                Ok(None)
            } else {
                Ok(Some(parsed as usize))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_parameter() {
        let params = QueryParams::parse("q=hello&l=3").unwrap();
        assert_eq!(params.unique("q").unwrap(), Some("hello"));
        assert_eq!(params.unique("l").unwrap(), Some("3"));
        assert_eq!(params.unique("ids").unwrap(), None);

        let params = QueryParams::parse("q=a&q=b").unwrap();
        assert!(params.unique("q").is_err());
    }

    #[test]
    fn test_concatenated_parameter() {
        let params = QueryParams::parse("ids=1+2&ids=3").unwrap();
        assert_eq!(params.concatenated("ids"), Some("1 2 3".to_owned()));
        assert_eq!(params.concatenated("other"), None);
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), None);
        assert_eq!(parse_limit(Some("-1")).unwrap(), None);
        assert_eq!(parse_limit(Some("0")).unwrap(), Some(0));
        assert_eq!(parse_limit(Some("25")).unwrap(), Some(25));
        assert!(parse_limit(Some("many")).is_err());
    }
}
