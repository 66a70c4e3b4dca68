/**
 * Blocking Verification Client
 * Same exchange as `client::VerificationClient`, holding the calling thread until it ends
 */

use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::redirect::Policy;
use std::sync::Arc;

use crate::client::{finish, prepare, ACCEPT_JSON};
use crate::config::ClientConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::Result;
use crate::request::{multipart_form, VerificationRequest};

/// Must not be constructed or used from inside an async runtime; use
/// [`crate::client::VerificationClient`] there.
///
/// Honors `connect_timeout` and `call_timeout` only; see [`ClientConfig`].
pub struct VerificationClient {
    config: ClientConfig,
    http: reqwest::blocking::Client,
    sink: Arc<dyn DiagnosticSink>,
}

impl VerificationClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(server_url)?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        // No per-read timeout on the blocking builder; `read_timeout` is unused here.
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.call_timeout)
            .user_agent(config.user_agent.as_str())
            .connection_verbose(config.verbose_tracing)
            .redirect(Policy::none())
            .build()?;
        let sink = Arc::new(TracingSink::new(config.redaction));

        Ok(Self { config, http, sink })
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn submit(
        &self,
        encrypted_bundle: &[u8],
        jpeg_image: Option<&[u8]>,
        auth_token: &str,
        template_id: &str,
        verification_id: &str,
    ) -> Result<String> {
        let mut request = VerificationRequest::new(
            encrypted_bundle.to_vec(),
            auth_token,
            template_id,
            verification_id,
        );
        request.jpeg_image = jpeg_image.map(<[u8]>::to_vec);
        self.send(&request)
    }

    pub fn send(&self, request: &VerificationRequest) -> Result<String> {
        let (endpoint, authorization) = prepare(&self.config, self.sink.as_ref(), request)?;

        let response = self
            .http
            .post(&endpoint)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, ACCEPT_JSON)
            .multipart(build_form(request)?)
            .send()?;

        let status = response.status();
        let body = if status.is_success() {
            Some(response.text()?)
        } else {
            response.text().ok()
        };

        finish(self.sink.as_ref(), status.as_u16(), body)
    }
}

fn build_form(request: &VerificationRequest) -> Result<Form> {
    Ok(multipart_form!(Form, Part, request))
}
