//! Client for the remote PDF renderer.
//!
//! The renderer is an opaque HTTP endpoint: `POST` a JSON body
//! `{"htmlContent": "..."}` and get the PDF bytes back. Every failure
//! (transport, non-2xx, unreadable or malformed body) is an [`ExportError`];
//! callers show the same notice for all of them. No retries.
//!
//! [`PdfRenderer`] is the seam the submission flow depends on, so tests and
//! alternative backends can stand in for [`PdfGeneratorClient`].

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::AppConfig;

/// Leading bytes of every PDF document.
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Notice shown to the user for any export failure.
pub const EXPORT_FAILURE_NOTICE: &str = "Erro ao gerar PDF.";

/// Maximum characters of an error response body kept in [`ExportError::Status`].
const ERROR_BODY_PREVIEW: usize = 200;

/// Errors from a PDF export round trip.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The request could not be sent or timed out.
    #[error("request failed: {0}")]
    Request(String),
    /// The renderer answered with a non-2xx status.
    #[error("PDF service HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body could not be read.
    #[error("failed to read response: {0}")]
    Body(String),
    /// The response body is not a PDF document.
    #[error("malformed PDF response: {0}")]
    Malformed(String),
}

impl ExportError {
    /// The user-facing notice. All failures collapse to the same message.
    pub fn notice(&self) -> &'static str {
        EXPORT_FAILURE_NOTICE
    }
}

/// A rendered PDF document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfDocument {
    bytes: Vec<u8>,
}

impl PdfDocument {
    /// Wrap response bytes, rejecting bodies that are empty or lack the PDF
    /// header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ExportError> {
        if bytes.is_empty() {
            return Err(ExportError::Malformed("empty body".into()));
        }
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ExportError::Malformed("missing %PDF header".into()));
        }
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Boxed future returned by [`PdfRenderer::render`].
pub type RenderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PdfDocument, ExportError>> + Send + 'a>>;

/// Anything that turns an HTML document into a PDF.
pub trait PdfRenderer: Send + Sync {
    fn render<'a>(&'a self, html: &'a str) -> RenderFuture<'a>;
}

/// JSON body expected by the renderer.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub html_content: &'a str,
}

/// HTTP client for the `/pdfgenerator/generate` endpoint.
pub struct PdfGeneratorClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PdfGeneratorClient {
    /// Create a client for `endpoint` with the default request timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ExportError> {
        Self::with_timeout(endpoint, Some(AppConfig::default().request_timeout))
    }

    /// Create a client with an explicit timeout (`None` waits indefinitely).
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ExportError> {
        let mut builder = reqwest::Client::builder().user_agent("construlink/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExportError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ExportError> {
        Self::with_timeout(config.pdf_endpoint.clone(), Some(config.request_timeout))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one HTML document and wait for the PDF.
    pub async fn generate(&self, html: &str) -> Result<PdfDocument, ExportError> {
        debug!(
            "PDF request: endpoint={}, html={} bytes",
            self.endpoint,
            html.len()
        );
        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/pdf")
            .json(&GenerateRequest { html_content: html })
            .send()
            .await
            .map_err(|e| ExportError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("PDF error body unreadable (HTTP {status}): {e}");
                    String::new()
                }
            };
            return Err(ExportError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ExportError::Body(e.to_string()))?;

        debug!(
            "PDF response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            bytes.len()
        );
        trace!("PDF response content-type: {content_type}");

        PdfDocument::from_bytes(bytes.to_vec())
    }
}

impl PdfRenderer for PdfGeneratorClient {
    fn render<'a>(&'a self, html: &'a str) -> RenderFuture<'a> {
        Box::pin(self.generate(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_html_content_key() {
        let body = serde_json::to_value(GenerateRequest {
            html_content: "<p>oi</p>",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"htmlContent": "<p>oi</p>"}));
    }

    #[test]
    fn document_requires_pdf_header() {
        assert!(matches!(
            PdfDocument::from_bytes(Vec::new()),
            Err(ExportError::Malformed(_))
        ));
        assert!(matches!(
            PdfDocument::from_bytes(b"<html>".to_vec()),
            Err(ExportError::Malformed(_))
        ));
        let doc = PdfDocument::from_bytes(b"%PDF-1.7\n%%EOF".to_vec()).unwrap();
        assert_eq!(doc.len(), 14);
        assert!(!doc.is_empty());
    }

    #[test]
    fn every_error_has_the_same_notice() {
        let errors = [
            ExportError::Request("connection refused".into()),
            ExportError::Status {
                status: 500,
                body: "boom".into(),
            },
            ExportError::Body("eof".into()),
            ExportError::Malformed("empty body".into()),
        ];
        for err in &errors {
            assert_eq!(err.notice(), "Erro ao gerar PDF.");
        }
        assert_eq!(errors[1].to_string(), "PDF service HTTP 500: boom");
    }

    #[test]
    fn client_keeps_endpoint() {
        let client =
            PdfGeneratorClient::new("http://localhost:3001/pdfgenerator/generate").unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:3001/pdfgenerator/generate"
        );
    }
}
