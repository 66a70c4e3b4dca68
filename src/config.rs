/**
 * Client Configuration
 * Server address, timeouts and tracing options, fixed once a client is built
 */

use std::time::Duration;
use url::Url;

use crate::diagnostics::RedactionPolicy;
use crate::error::{Error, Result};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3 * 60);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3 * 60);
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(4 * 60);

const VERIFICATION_PATH: &str = "biometricsverification";

/// Timeouts for one verification exchange.
///
/// reqwest has no write-phase timeout, so uploading the form is bounded by
/// `call_timeout` (4 minutes) rather than a separate write limit.
/// `read_timeout` is applied per read by the async client only; the blocking
/// client is bounded by `connect_timeout` and `call_timeout`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    server_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub call_timeout: Duration,
    /// Turns on reqwest connection-level tracing, which logs raw request
    /// bytes including the Authorization header. Keep it off outside of
    /// local debugging; `redaction` does not apply to that output.
    pub verbose_tracing: bool,
    pub redaction: RedactionPolicy,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(server_url: &str) -> Result<Self> {
        let trimmed = server_url.trim().trim_end_matches('/');
        let parsed =
            Url::parse(trimmed).map_err(|e| Error::InvalidServerUrl(format!("{trimmed}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::InvalidServerUrl(trimmed.to_string()));
        }

        Ok(Self {
            server_url: trimmed.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            verbose_tracing: false,
            redaction: RedactionPolicy::default(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        })
    }

    /// Reads `IAD_SERVER_URL`, `IAD_VERBOSE_TRACING` and `IAD_REVEAL_CREDENTIALS`.
    pub fn from_env() -> Result<Self> {
        let server_url = std::env::var("IAD_SERVER_URL")
            .map_err(|_| Error::InvalidServerUrl("IAD_SERVER_URL is not set".to_string()))?;

        let mut config = Self::new(&server_url)?;
        config.verbose_tracing = env_flag("IAD_VERBOSE_TRACING");
        if env_flag("IAD_REVEAL_CREDENTIALS") {
            config.redaction = RedactionPolicy::Reveal;
        }
        Ok(config)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.server_url, VERIFICATION_PATH)
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_verbose_tracing(mut self, enabled: bool) -> Self {
        self.verbose_tracing = enabled;
        self
    }

    pub fn with_redaction(mut self, policy: RedactionPolicy) -> Self {
        self.redaction = policy;
        self
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
