//! Runtime settings shared by the CLI and the TUI.

use std::path::PathBuf;
use std::time::Duration;

use crate::DEFAULT_PDF_ENDPOINT;

/// Environment variable that overrides the PDF endpoint.
pub const PDF_URL_ENV: &str = "CONSTRULINK_PDF_URL";

/// Application configuration.
///
/// Every field has a usable default, so a bare `AppConfig::default()` talks
/// to a renderer on localhost and writes into the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PDF renderer URL. Default: `http://localhost:3001/pdfgenerator/generate`.
    pub pdf_endpoint: String,
    /// Per-request timeout for the renderer. Default: 120 s.
    pub request_timeout: Duration,
    /// Where generated PDFs are written. Default: `./rdo-output`.
    pub output_dir: PathBuf,
    /// Token storage file. Default: `./.construlink/storage.json`.
    pub storage_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pdf_endpoint: DEFAULT_PDF_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(120),
            output_dir: PathBuf::from("./rdo-output"),
            storage_path: PathBuf::from("./.construlink/storage.json"),
        }
    }
}

impl AppConfig {
    pub fn with_pdf_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.pdf_endpoint = endpoint.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Pick the endpoint from a flag, then `CONSTRULINK_PDF_URL`, then the
    /// current value.
    pub fn resolve_endpoint(self, flag: Option<String>) -> Self {
        self.resolve_endpoint_with(flag, std::env::var(PDF_URL_ENV).ok())
    }

    fn resolve_endpoint_with(self, flag: Option<String>, env: Option<String>) -> Self {
        match flag.or(env.filter(|v| !v.trim().is_empty())) {
            Some(endpoint) => self.with_pdf_endpoint(endpoint),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_renderer() {
        let config = AppConfig::default();
        assert_eq!(
            config.pdf_endpoint,
            "http://localhost:3001/pdfgenerator/generate"
        );
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.output_dir, PathBuf::from("./rdo-output"));
    }

    #[test]
    fn flag_wins_over_environment() {
        let config = AppConfig::default().resolve_endpoint_with(
            Some("http://flag/pdf".into()),
            Some("http://env/pdf".into()),
        );
        assert_eq!(config.pdf_endpoint, "http://flag/pdf");

        let config =
            AppConfig::default().resolve_endpoint_with(None, Some("http://env/pdf".into()));
        assert_eq!(config.pdf_endpoint, "http://env/pdf");

        let config = AppConfig::default().resolve_endpoint_with(None, Some("  ".into()));
        assert_eq!(config.pdf_endpoint, DEFAULT_PDF_ENDPOINT);
    }

    #[test]
    fn builders_override_fields() {
        let config = AppConfig::default()
            .with_request_timeout(Duration::from_secs(5))
            .with_output_dir("/tmp/rdo")
            .with_storage_path("/tmp/s.json");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/rdo"));
        assert_eq!(config.storage_path, PathBuf::from("/tmp/s.json"));
    }
}
