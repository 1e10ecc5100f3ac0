use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's own message when it sent one.
    #[error("request to {url} failed ({status}): {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
        body: Option<serde_json::Value>,
    },

    #[error("session expired, please log in again")]
    Unauthorized,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    /// The message to show the user: the backend's message for API errors,
    /// otherwise the error text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Understands `{"message": "..."}` from the backend and
/// `{"error": {"message": "..."}}` from the media host.
pub(crate) fn extract_message(body: &serde_json::Value) -> Option<String> {
    body.get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| {
            body.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(serde_json::Value::as_str)
        })
        .map(str::to_owned)
}
