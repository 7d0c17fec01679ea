//! UI state shared between the async runtime and a frontend.
//!
//! ```text
//! export driver ──writes──▶ Arc<Mutex<UiState>> ◀──reads/writes── TUI
//! ```
//!
//! The frontend edits the draft and asks for a submission with
//! [`request_submit`]. The export driver ([`drive_exports`]) picks the
//! pending HTML up, calls the renderer without holding the lock and writes
//! the outcome back with [`complete_export`]. Neither side ever holds the
//! lock across an `.await`.

pub mod tracing;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ::tracing::{debug, warn};

use crate::artifact::ArtifactStore;
use crate::export::{ExportError, PdfDocument, PdfRenderer};
use crate::nav::{Navigator, Route};
use crate::reducer::FormAction;
use crate::session::{FormSession, Notice, PendingExport};

/// Maximum log lines kept in memory.
pub const MAX_LOG_LINES: usize = 2000;
/// Trim to this many when the cap is exceeded.
pub const LOG_TRIM_TO: usize = 1200;

/// How often [`drive_exports`] checks for a pending submission.
const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ── Log Types ─────────────────────────────────────────────────────────

/// A single log line captured from tracing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Fixed-width label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

// ── UiState ───────────────────────────────────────────────────────────

/// Everything a frontend renders.
pub struct UiState {
    // ── Navigation ──
    pub route: Route,
    /// The open form. Present only while `route` is [`Route::Form`].
    pub form: Option<FormSession>,
    pub artifacts: Arc<ArtifactStore>,

    // ── Export ──
    /// Blocking message the user has to dismiss.
    pub notice: Option<Notice>,
    /// Submission waiting for the export driver.
    pub pending_export: Option<PendingExport>,
    pub last_artifact_url: Option<String>,

    // ── Tracing log capture ──
    pub logs: Vec<LogLine>,

    // ── Lifecycle ──
    pub running: bool,
    /// The frontend sets this to `true` when the user requests quit.
    pub quit_requested: bool,
}

impl UiState {
    pub fn new(artifacts: Arc<ArtifactStore>) -> Self {
        Self {
            route: Route::Home,
            form: None,
            artifacts,
            notice: None,
            pending_export: None,
            last_artifact_url: None,
            logs: Vec::new(),
            running: true,
            quit_requested: false,
        }
    }

    /// Whether an export is outstanding for the open form.
    pub fn is_exporting(&self) -> bool {
        self.form.as_ref().is_some_and(FormSession::is_submitting)
    }

    /// Form progress, if the form is open.
    pub fn progress(&self) -> Option<f64> {
        self.form.as_ref().map(|f| f.store().progress())
    }
}

impl Navigator for UiState {
    /// Switch screens. Entering the form mounts a fresh session; leaving it
    /// discards the draft. Leaving is refused while an export is in flight.
    fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        if self.is_exporting() {
            warn!("Navigation to {route} ignored: PDF export in progress");
            return;
        }
        debug!("Navigate {} -> {}", self.route, route);
        self.form = match route {
            Route::Form => Some(FormSession::new(Arc::clone(&self.artifacts))),
            _ => None,
        };
        self.route = route;
    }
}

// ── Convenience Updaters ──────────────────────────────────────────────

/// Lock the shared state and run the body on the guard. Poisoned locks are
/// skipped.
macro_rules! with_state {
    ($state:expr, |$s:ident| $body:block) => {
        if let Ok(mut $s) = $state.lock() {
            $body
        }
    };
}

pub fn navigate(state: &Arc<Mutex<UiState>>, route: Route) {
    with_state!(state, |s| { s.navigate(route) });
}

/// Apply a form action to the open form. Ignored while exporting.
pub fn dispatch(state: &Arc<Mutex<UiState>>, action: FormAction) {
    with_state!(state, |s| {
        let exporting = s.is_exporting();
        match s.form.as_mut() {
            Some(_) if exporting => debug!("Form locked during export, dropping {action:?}"),
            Some(form) => form.dispatch(action),
            None => debug!("No form open, dropping {action:?}"),
        }
    });
}

/// Queue the open form for export. Returns `true` if a submission was
/// queued; a rejected submit leaves a notice instead.
pub fn request_submit(state: &Arc<Mutex<UiState>>) -> bool {
    let mut queued = false;
    with_state!(state, |s| {
        let result = match s.form.as_mut() {
            Some(form) => form.begin_submit(),
            None => return false,
        };
        match result {
            Ok(pending) => {
                s.pending_export = Some(pending);
                queued = true;
            }
            Err(e) => s.notice = Some(e.notice()),
        }
    });
    queued
}

pub fn take_pending_export(state: &Arc<Mutex<UiState>>) -> Option<PendingExport> {
    state.lock().ok().and_then(|mut s| s.pending_export.take())
}

/// Hand the renderer's answer to the open form and record the notice.
pub fn complete_export(state: &Arc<Mutex<UiState>>, result: Result<PdfDocument, ExportError>) {
    with_state!(state, |s| {
        let Some(form) = s.form.as_mut() else {
            warn!("Export finished with no form open");
            return;
        };
        match form.finish_submit(result) {
            Ok(outcome) => {
                s.last_artifact_url = Some(outcome.artifact.url);
                s.notice = Some(outcome.notice);
            }
            Err(e) => s.notice = Some(e.notice()),
        }
    });
}

pub fn dismiss_notice(state: &Arc<Mutex<UiState>>) {
    with_state!(state, |s| { s.notice = None });
}

pub fn request_quit(state: &Arc<Mutex<UiState>>) {
    with_state!(state, |s| { s.quit_requested = true });
}

/// Run one queued export, if any. Returns whether one ran.
pub async fn export_pending(state: &Arc<Mutex<UiState>>, renderer: &dyn PdfRenderer) -> bool {
    let Some(pending) = take_pending_export(state) else {
        return false;
    };
    let result = renderer.render(pending.html()).await;
    complete_export(state, result);
    true
}

/// Serve export requests until the frontend asks to quit.
pub async fn drive_exports(state: Arc<Mutex<UiState>>, renderer: &dyn PdfRenderer) {
    loop {
        let stop = state
            .lock()
            .map(|s| s.quit_requested || !s.running)
            .unwrap_or(true);
        if stop {
            break;
        }
        if !export_pending(&state, renderer).await {
            tokio::time::sleep(EXPORT_POLL_INTERVAL).await;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
