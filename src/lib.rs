/*!
 * iad-verify
 * Client for the biometric verification endpoint of a face liveness server
 *
 * Handles:
 * - Multipart submission of an encrypted capture bundle (plus optional JPEG)
 * - Bearer token normalization
 * - Classification of success, empty and error responses
 * - Redacted diagnostics
 */

pub mod blocking;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod request;
pub mod response;

pub use client::VerificationClient;
pub use config::ClientConfig;
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, NoopSink, RedactionPolicy, TracingSink};
pub use error::{Error, Result, ServerError};
pub use request::{normalize_bearer_token, VerificationRequest};
