/**
 * Verification Client
 * Submits one biometric verification request per call over HTTPS
 */

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::error::{Error, Result};
use crate::request::{multipart_form, VerificationRequest};
use crate::response::{classify_response, Outcome};

pub(crate) const ACCEPT_JSON: &str = "application/json";

pub struct VerificationClient {
    config: ClientConfig,
    http: reqwest::Client,
    sink: Arc<dyn DiagnosticSink>,
}

impl VerificationClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(server_url)?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
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

    /// Sends the bundle and returns the raw response body.
    pub async fn submit(
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
        self.send(&request).await
    }

    pub async fn send(&self, request: &VerificationRequest) -> Result<String> {
        let (endpoint, authorization) = prepare(&self.config, self.sink.as_ref(), request)?;

        let response = self
            .http
            .post(&endpoint)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, ACCEPT_JSON)
            .multipart(build_form(request)?)
            .send()
            .await?;

        let status = response.status();
        let body = if status.is_success() {
            Some(response.text().await?)
        } else {
            response.text().await.ok()
        };

        finish(self.sink.as_ref(), status.as_u16(), body)
    }
}

/// Validates the request, builds the Authorization header and reports the send.
pub(crate) fn prepare(
    config: &ClientConfig,
    sink: &dyn DiagnosticSink,
    request: &VerificationRequest,
) -> Result<(String, HeaderValue)> {
    request.validate()?;

    let authorization = request.authorization();
    let mut header = HeaderValue::from_str(&authorization).map_err(|_| Error::InvalidHeader)?;
    header.set_sensitive(true);

    let endpoint = config.endpoint();
    sink.record(&DiagnosticEvent::Sending {
        endpoint: &endpoint,
        authorization: &authorization,
        template_id: &request.template_id,
        verification_id: &request.verification_id,
        bundle_len: request.encrypted_bundle.len(),
        has_image: request.jpeg_image.is_some(),
    });

    Ok((endpoint, header))
}

pub(crate) fn finish(sink: &dyn DiagnosticSink, status: u16, body: Option<String>) -> Result<String> {
    sink.record(&DiagnosticEvent::Completed { status });

    let outcome = classify_response(status, body);
    match &outcome {
        Outcome::Failure(err) => sink.record(&DiagnosticEvent::ServerError {
            status,
            body: err.raw_body(),
        }),
        Outcome::EmptySuccess => sink.record(&DiagnosticEvent::EmptyBody { status }),
        Outcome::Success(_) => {}
    }
    outcome.into_result()
}

fn build_form(request: &VerificationRequest) -> Result<Form> {
    Ok(multipart_form!(Form, Part, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl DiagnosticSink for Recorder {
        fn record(&self, event: &DiagnosticEvent<'_>) {
            self.0.lock().unwrap().push(format!("{event:?}"));
        }
    }

    #[test]
    fn prepare_rejects_empty_bundle_before_reporting() {
        let config = ClientConfig::new("http://localhost:1").unwrap();
        let recorder = Recorder::default();
        let request = VerificationRequest::new(Vec::new(), "tok", "t", "v");

        assert!(matches!(
            prepare(&config, &recorder, &request),
            Err(Error::EmptyBundle)
        ));
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn prepare_rejects_token_with_control_characters() {
        let config = ClientConfig::new("http://localhost:1").unwrap();
        let request = VerificationRequest::new(vec![1], "abc\u{7}def", "t", "v");

        assert!(matches!(
            prepare(&config, &Recorder::default(), &request),
            Err(Error::InvalidHeader)
        ));
    }

    #[test]
    fn prepare_builds_sensitive_header() {
        let config = ClientConfig::new("http://localhost:1").unwrap();
        let request = VerificationRequest::new(vec![1], " bearer abc ", "t", "v");

        let (endpoint, header) = prepare(&config, &Recorder::default(), &request).unwrap();
        assert_eq!(endpoint, "http://localhost:1/biometricsverification");
        assert_eq!(header.to_str().unwrap(), "bearer abc");
        assert!(header.is_sensitive());
    }

    #[test]
    fn finish_reports_server_error_body() {
        let recorder = Recorder::default();
        let result = finish(&recorder, 500, Some("internal error".to_string()));

        assert_eq!(result.unwrap_err().status(), Some(500));
        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[1].contains("internal error"));
    }

    #[test]
    fn finish_reports_empty_success() {
        let recorder = Recorder::default();
        assert!(matches!(
            finish(&recorder, 200, Some(String::new())),
            Err(Error::EmptyResponseBody)
        ));
        assert!(recorder.0.lock().unwrap()[1].starts_with("EmptyBody"));
    }
}
