/// Shared error type used across all Parley crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The completion service answered with a non-success status.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Api {
        status: u16,
        /// The `error.message` field of the response body, when present.
        message: Option<String>,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The human-readable diagnostic supplied by the remote service, if any.
    ///
    /// Only errors that carry a service-authored message return `Some`;
    /// transport failures, timeouts and local errors return `None` so the
    /// caller can substitute its own fallback text.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Error::Api {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_service_message() {
        let err = Error::Api {
            status: 429,
            message: Some("quota exceeded".into()),
        };
        assert_eq!(err.service_message(), Some("quota exceeded"));
        assert_eq!(err.to_string(), "HTTP 429: quota exceeded");
    }

    #[test]
    fn blank_service_message_is_ignored() {
        let err = Error::Api {
            status: 500,
            message: Some("   ".into()),
        };
        assert_eq!(err.service_message(), None);
    }

    #[test]
    fn transport_errors_have_no_service_message() {
        assert_eq!(Error::Http("connection refused".into()).service_message(), None);
        assert_eq!(Error::Timeout("30s".into()).service_message(), None);
        assert_eq!(
            Error::MalformedResponse("no candidates".into()).service_message(),
            None
        );
    }
}
