/**
 * Verification Request
 * One biometric submission: encrypted bundle, optional JPEG, credentials and ids
 */

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

pub const BUNDLE_FIELD: &str = "image";
pub const BUNDLE_FILE_NAME: &str = "capture.bin";
pub const BUNDLE_CONTENT_TYPE: &str = "application/octet-stream";
pub const TEMPLATE_ID_FIELD: &str = "template_id";
pub const VERIFICATION_ID_FIELD: &str = "verification_id";
pub const IMAGE_BASE64_FIELD: &str = "image_base64";

const BEARER_PREFIX: &str = "Bearer ";
const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub encrypted_bundle: Vec<u8>,
    pub jpeg_image: Option<Vec<u8>>,
    pub auth_token: String,
    pub template_id: String,
    pub verification_id: String,
}

/// A single multipart field, independent of the HTTP client that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart<'a> {
    File {
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        bytes: &'a [u8],
    },
    Text {
        name: &'static str,
        value: String,
    },
}

/// Builds a reqwest multipart `Form` from [`VerificationRequest::form_parts`].
///
/// The async and blocking reqwest modules expose the same `Form`/`Part` API
/// under different paths, so both clients expand this with their own types.
/// Must be used inside a function returning `crate::error::Result`.
macro_rules! multipart_form {
    ($form:ty, $part:ty, $request:expr) => {{
        let mut form = <$form>::new();
        for part in $request.form_parts() {
            form = match part {
                $crate::request::FormPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let part = <$part>::bytes(bytes.to_vec())
                        .file_name(file_name)
                        .mime_str(content_type)?;
                    form.part(name, part)
                }
                $crate::request::FormPart::Text { name, value } => form.text(name, value),
            };
        }
        form
    }};
}
pub(crate) use multipart_form;

impl VerificationRequest {
    pub fn new(
        encrypted_bundle: Vec<u8>,
        auth_token: impl Into<String>,
        template_id: impl Into<String>,
        verification_id: impl Into<String>,
    ) -> Self {
        Self {
            encrypted_bundle,
            jpeg_image: None,
            auth_token: auth_token.into(),
            template_id: template_id.into(),
            verification_id: verification_id.into(),
        }
    }

    pub fn with_jpeg_image(mut self, jpeg: Vec<u8>) -> Self {
        self.jpeg_image = Some(jpeg);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.encrypted_bundle.is_empty() {
            return Err(Error::EmptyBundle);
        }
        Ok(())
    }

    pub fn authorization(&self) -> String {
        normalize_bearer_token(&self.auth_token)
    }

    /// Parts in wire order. `image_base64` only appears when a JPEG is attached.
    pub fn form_parts(&self) -> Vec<FormPart<'_>> {
        let mut parts = vec![
            FormPart::File {
                name: BUNDLE_FIELD,
                file_name: BUNDLE_FILE_NAME,
                content_type: BUNDLE_CONTENT_TYPE,
                bytes: &self.encrypted_bundle,
            },
            FormPart::Text {
                name: TEMPLATE_ID_FIELD,
                value: self.template_id.clone(),
            },
            FormPart::Text {
                name: VERIFICATION_ID_FIELD,
                value: self.verification_id.clone(),
            },
        ];

        if let Some(jpeg) = &self.jpeg_image {
            parts.push(FormPart::Text {
                name: IMAGE_BASE64_FIELD,
                value: jpeg_data_uri(jpeg),
            });
        }

        parts
    }
}

/// Trims the token and prepends `Bearer ` unless it already starts with that
/// scheme in any case. Prefixed tokens are otherwise sent as given.
pub fn normalize_bearer_token(token: &str) -> String {
    let token = token.trim();
    let has_prefix = token
        .get(..BEARER_PREFIX.len())
        .map(|p| p.eq_ignore_ascii_case(BEARER_PREFIX))
        .unwrap_or(false);

    if has_prefix {
        token.to_string()
    } else {
        format!("{}{}", BEARER_PREFIX, token)
    }
}

pub fn jpeg_data_uri(jpeg: &[u8]) -> String {
    format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(jpeg))
}
