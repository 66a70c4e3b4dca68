/**
 * Diagnostics
 * Pluggable sink for submission events, with credential redaction
 */

use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

/// Whether credentials may appear in diagnostic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactionPolicy {
    #[default]
    Redact,
    Reveal,
}

impl RedactionPolicy {
    /// Renders an Authorization value for logging.
    ///
    /// Redacted values keep the scheme and a short SHA-256 fingerprint so two
    /// log lines can still be matched to the same token.
    pub fn authorization(&self, value: &str) -> String {
        match self {
            RedactionPolicy::Reveal => value.to_string(),
            RedactionPolicy::Redact => {
                let mut hasher = Sha256::new();
                hasher.update(value.as_bytes());
                let digest = hex::encode(hasher.finalize());
                format!("Bearer <redacted sha256:{}>", &digest[..8])
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent<'a> {
    Sending {
        endpoint: &'a str,
        authorization: &'a str,
        template_id: &'a str,
        verification_id: &'a str,
        bundle_len: usize,
        has_image: bool,
    },
    Completed {
        status: u16,
    },
    ServerError {
        status: u16,
        body: Option<&'a str>,
    },
    EmptyBody {
        status: u16,
    },
}

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &DiagnosticEvent<'_>);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    policy: RedactionPolicy,
}

impl TracingSink {
    pub fn new(policy: RedactionPolicy) -> Self {
        Self { policy }
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &DiagnosticEvent<'_>) {
        match event {
            DiagnosticEvent::Sending {
                endpoint,
                authorization,
                template_id,
                verification_id,
                bundle_len,
                has_image,
            } => {
                info!(
                    "Submitting biometric verification: endpoint={}, template_id={}, verification_id={}, bundle_len={}, has_image={}",
                    endpoint, template_id, verification_id, bundle_len, has_image
                );
                debug!(
                    "Sending Authorization: {}",
                    self.policy.authorization(authorization)
                );
            }
            DiagnosticEvent::Completed { status } => {
                info!("Verification server responded: status={}", status);
            }
            DiagnosticEvent::ServerError { status, body } => {
                error!(
                    "Server error: status={}, body={}",
                    status,
                    body.unwrap_or("<unreadable>")
                );
            }
            DiagnosticEvent::EmptyBody { status } => {
                warn!("Verification succeeded with empty body: status={}", status);
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: &DiagnosticEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_hides_token() {
        let rendered = RedactionPolicy::Redact.authorization("Bearer s3cret-token");
        assert!(!rendered.contains("s3cret-token"));
        assert!(rendered.starts_with("Bearer <redacted sha256:"));
        assert_eq!(
            rendered,
            RedactionPolicy::Redact.authorization("Bearer s3cret-token")
        );
        assert_ne!(
            rendered,
            RedactionPolicy::Redact.authorization("Bearer other-token")
        );
    }

    #[test]
    fn reveal_passes_value_through() {
        assert_eq!(
            RedactionPolicy::Reveal.authorization("Bearer abc"),
            "Bearer abc"
        );
    }
}
