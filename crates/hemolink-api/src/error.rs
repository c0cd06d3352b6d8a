use hemolink_client_core::ClientInputError;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    Input(#[from] ClientInputError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid request path")]
    InvalidPath,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for an HTTP 401 that survived the refresh path (or bypassed it).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

pub(crate) fn http_error(status: StatusCode, body: &[u8]) -> ApiError {
    let body = String::from_utf8_lossy(body).trim().to_string();
    let body = if body.is_empty() {
        "<empty>".to_string()
    } else {
        body
    };
    ApiError::Http { status, body }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{ApiError, http_error};

    #[test]
    fn http_error_keeps_status_and_trimmed_body() {
        let error = http_error(StatusCode::BAD_GATEWAY, b" gateway failed ");
        assert_eq!(
            error.to_string(),
            "http 502 Bad Gateway: gateway failed"
        );

        let empty = http_error(StatusCode::SERVICE_UNAVAILABLE, b"  ");
        assert_eq!(
            empty.to_string(),
            "http 503 Service Unavailable: <empty>"
        );
    }

    #[test]
    fn unauthorized_detection_only_matches_401() {
        assert!(http_error(StatusCode::UNAUTHORIZED, b"").is_unauthorized());
        assert!(!http_error(StatusCode::FORBIDDEN, b"").is_unauthorized());
        assert!(!ApiError::Transport("reset".to_string()).is_unauthorized());
    }
}
