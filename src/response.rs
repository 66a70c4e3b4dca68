/**
 * Response classification
 * Maps a (status, body) pair onto the submission outcome without any I/O
 */

use crate::error::{Error, Result, ServerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    EmptySuccess,
    Failure(ServerError),
}

impl Outcome {
    pub fn into_result(self) -> Result<String> {
        match self {
            Outcome::Success(body) => Ok(body),
            Outcome::EmptySuccess => Err(Error::EmptyResponseBody),
            Outcome::Failure(err) => Err(Error::Server(err)),
        }
    }
}

/// `body` is `None` when the response body could not be read.
///
/// Success bodies are returned verbatim; only emptiness is checked.
pub fn classify_response(status: u16, body: Option<String>) -> Outcome {
    if !(200..300).contains(&status) {
        return Outcome::Failure(ServerError::from_body(status, body.as_deref()));
    }

    match body {
        Some(body) if !body.is_empty() => Outcome::Success(body),
        _ => Outcome::EmptySuccess,
    }
}
