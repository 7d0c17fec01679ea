//! ConstruLink daily construction report (RDO).
//!
//! This crate holds everything behind the report form: the draft and its
//! state transitions, the completion estimate, the HTML document, the client
//! for the remote PDF renderer and the small amount of app plumbing around
//! them (token storage, routes, shared UI state).
//!
//! # Where to find things
//!
//! - **Edit a draft:** [`FormStore`](reducer::FormStore) with
//!   [`FormAction`](reducer::FormAction); the pure transition is
//!   [`reduce`](reducer::reduce).
//! - **Completion percentage:** [`progress::progress`].
//! - **Export to PDF:** [`FormSession::submit`](session::FormSession::submit)
//!   against a [`PdfRenderer`](export::PdfRenderer), normally
//!   [`PdfGeneratorClient`](export::PdfGeneratorClient).
//! - **Drive a frontend:** [`ui::UiState`] and [`ui::drive_exports`].
//!
//! ```ignore
//! use construlink::prelude::*;
//!
//! let mut session = FormSession::new(Arc::new(ArtifactStore::new("./rdo-output")));
//! session.dispatch(FormAction::set_text(TextField::Company, "ACME"));
//! let client = PdfGeneratorClient::new(DEFAULT_PDF_ENDPOINT)?;
//! let outcome = session.submit(&client).await?;
//! println!("{}", outcome.artifact.url);
//! ```

pub mod artifact;
pub mod config;
pub mod draft;
pub mod export;
pub mod html;
pub mod nav;
pub mod prelude;
pub mod progress;
pub mod reducer;
pub mod session;
pub mod token;
pub mod ui;

/// Default PDF renderer endpoint.
pub const DEFAULT_PDF_ENDPOINT: &str = "http://localhost:3001/pdfgenerator/generate";
