//! The report form's submission flow.
//!
//! A [`FormSession`] lives as long as the form screen is open. Submitting
//! builds the HTML from the current draft, sends it to a [`PdfRenderer`],
//! saves the PDF and resets the draft. On failure the draft is kept as-is
//! so the user can retry, and no artifact is produced.
//!
//! Only one export may be outstanding per session. The flow is split into
//! [`begin_submit`](FormSession::begin_submit) and
//! [`finish_submit`](FormSession::finish_submit) so a UI that shares the
//! session behind a lock can release it while the request is in flight;
//! [`submit`](FormSession::submit) runs both halves for callers that own
//! the session outright.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::artifact::{ArtifactError, ArtifactStore, PdfArtifact};
use crate::export::{EXPORT_FAILURE_NOTICE, ExportError, PdfDocument, PdfRenderer};
use crate::html::render_html;
use crate::reducer::{FormAction, FormStore};

/// Notice shown after a successful export.
pub const EXPORT_SUCCESS_NOTICE: &str = "PDF gerado com sucesso!";

/// A blocking message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::Failure(_))
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("an export is already in progress")]
    InFlight,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl SubmitError {
    pub fn notice(&self) -> Notice {
        match self {
            SubmitError::InFlight => Notice::Failure("Aguarde a geração do PDF.".into()),
            SubmitError::Export(_) | SubmitError::Artifact(_) => {
                Notice::Failure(EXPORT_FAILURE_NOTICE.into())
            }
        }
    }
}

/// Result of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub artifact: PdfArtifact,
    pub notice: Notice,
}

/// HTML captured at the start of a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingExport {
    html: String,
}

impl PendingExport {
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Form state plus everything needed to submit it.
#[derive(Debug)]
pub struct FormSession {
    store: FormStore,
    artifacts: Arc<ArtifactStore>,
    in_flight: bool,
    last_artifact: Option<PdfArtifact>,
}

impl FormSession {
    pub fn new(artifacts: Arc<ArtifactStore>) -> Self {
        Self::with_store(FormStore::new(), artifacts)
    }

    pub fn with_store(store: FormStore, artifacts: Arc<ArtifactStore>) -> Self {
        Self {
            store,
            artifacts,
            in_flight: false,
            last_artifact: None,
        }
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn dispatch(&mut self, action: FormAction) {
        self.store.dispatch(action);
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// URL of the most recent PDF produced by this session.
    pub fn last_artifact(&self) -> Option<&PdfArtifact> {
        self.last_artifact.as_ref()
    }

    /// Mark an export as outstanding and capture the draft's HTML.
    pub fn begin_submit(&mut self) -> Result<PendingExport, SubmitError> {
        if self.in_flight {
            warn!("Submit rejected: an export is already in flight");
            return Err(SubmitError::InFlight);
        }
        self.in_flight = true;
        Ok(PendingExport {
            html: render_html(self.store.state()),
        })
    }

    /// Apply the renderer's answer to the session.
    ///
    /// On success the PDF is saved and the draft reset. On any failure the
    /// draft is left untouched.
    pub fn finish_submit(
        &mut self,
        result: Result<PdfDocument, ExportError>,
    ) -> Result<SubmitOutcome, SubmitError> {
        if !self.in_flight {
            warn!("Export finished without a matching submit");
        }
        self.in_flight = false;

        let artifact = result
            .map_err(SubmitError::from)
            .and_then(|doc| self.artifacts.save(&doc).map_err(SubmitError::from));

        match artifact {
            Ok(artifact) => {
                info!("PDF generated: {}", artifact.url);
                self.store.dispatch(FormAction::Reset);
                self.last_artifact = Some(artifact.clone());
                Ok(SubmitOutcome {
                    artifact,
                    notice: Notice::Success(EXPORT_SUCCESS_NOTICE.into()),
                })
            }
            Err(e) => {
                error!("PDF export failed: {e}");
                Err(e)
            }
        }
    }

    /// Run a whole submission against `renderer`.
    ///
    /// Dropping the returned future before it completes clears the in-flight
    /// flag and leaves the draft untouched.
    pub async fn submit(
        &mut self,
        renderer: &dyn PdfRenderer,
    ) -> Result<SubmitOutcome, SubmitError> {
        let pending = self.begin_submit()?;
        let mut guard = InFlightGuard(self);
        let result = renderer.render(pending.html()).await;
        guard.0.finish_submit(result)
    }
}

/// Clears the in-flight flag if a submission is abandoned mid-request.
struct InFlightGuard<'a>(&'a mut FormSession);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.0.in_flight {
            warn!("PDF export cancelled before the renderer answered");
            self.0.in_flight = false;
        }
    }
}
