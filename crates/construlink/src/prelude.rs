//! Commonly used types, re-exported for `use construlink::prelude::*`.

pub use crate::DEFAULT_PDF_ENDPOINT;
pub use crate::artifact::{ArtifactStore, PdfArtifact};
pub use crate::config::AppConfig;
pub use crate::draft::{EquipmentEntry, Field, PersonnelEntry, ReportDraft, TextField};
pub use crate::export::{ExportError, PdfDocument, PdfGeneratorClient, PdfRenderer};
pub use crate::html::render_html;
pub use crate::nav::{Navigator, Route};
pub use crate::reducer::{FieldValue, FormAction, FormError, FormStore, ListItem};
pub use crate::session::{FormSession, Notice, SubmitError, SubmitOutcome};
pub use crate::token::{FileStorage, KeyValueStorage, MemoryStorage, TokenStore};
pub use std::sync::Arc;
