/**
 * Error types
 * Every failure of a verification submission surfaces as one `Error`
 */

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request was successful but the response body was empty.")]
    EmptyResponseBody,
    #[error("{0}")]
    Server(ServerError),
    #[error("Encrypted bundle must not be empty")]
    EmptyBundle,
    #[error("Invalid server url: {0}")]
    InvalidServerUrl(String),
    #[error("Authorization token is not a valid header value")]
    InvalidHeader,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when no response was obtained from the server at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// HTTP status carried by a server-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Non-success response from the verification server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    status: u16,
    message: Option<String>,
    raw_body: Option<String>,
}

impl ServerError {
    /// Builds the error from a status and whatever body could be read.
    ///
    /// The message is taken from a JSON `message` string field when there is
    /// one. Otherwise the raw body is kept; an unreadable or empty body leaves
    /// only the status code.
    pub fn from_body(status: u16, body: Option<&str>) -> Self {
        // An empty body reads as unreadable: "(Empty Body)" rather than a
        // trailing ": ". Both forms carry the status code.
        let raw_body = body.filter(|b| !b.is_empty()).map(str::to_string);
        let message = raw_body.as_deref().and_then(extract_message);

        Self {
            status,
            message,
            raw_body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.raw_body) {
            (Some(message), _) => write!(f, "{} (Code: {})", message, self.status),
            (None, Some(body)) => write!(f, "Request failed with code {}: {}", self.status, body),
            (None, None) => write!(f, "Request failed with code {} (Empty Body)", self.status),
        }
    }
}

impl std::error::Error for ServerError {}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// Only JSON objects; derive would also accept `["msg"]` as a sequence.
fn extract_message(body: &str) -> Option<String> {
    if !body.trim_start().starts_with('{') {
        return None;
    }
    serde_json::from_str::<ErrorBody>(body).ok()?.message
}
