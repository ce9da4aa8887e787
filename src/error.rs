use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the backend or saving its files.
///
/// Every variant is caught by the handler that triggered the request and
/// turned into banner text via [`ClientError::user_message`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    /// Response body was not the JSON we expected
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint could not be resolved against the base URL
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Text shown to the user: the backend's own message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ClientError::Server {
            status: StatusCode::BAD_REQUEST,
            message: Some("bad url".to_string()),
        };
        assert_eq!(err.user_message("fallback"), "bad url");
    }

    #[test]
    fn missing_message_uses_fallback() {
        let err = ClientError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.user_message("Failed to fetch video information"), "Failed to fetch video information");
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn decode_errors_use_fallback() {
        let err: ClientError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.user_message("oops"), "oops");
    }
}
