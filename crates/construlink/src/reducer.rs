//! Form state transitions.
//!
//! [`reduce`] is the whole state machine: replace a field, append to a list,
//! or reset to the initial snapshot. Actions are typed, so a value can only
//! be stored in a field of the matching type. Text front-ends that address
//! fields by identifier go through [`FormAction::set_from_str`] and
//! [`FormAction::add_from_str`], which fail with a [`FormError`] instead.
//!
//! [`FormStore`] owns a draft the way the form page does and keeps the
//! completion percentage current after every dispatch.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::trace;

use crate::draft::{
    CHECKLIST_ITEMS, DATE_FORMAT, EquipmentEntry, Field, PersonnelEntry, ProgressPhoto,
    ReportDraft, SafetyChecklist, TextField,
};
use crate::progress::progress;

/// Errors from building an action out of untyped input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is not a list")]
    NotAList(Field),
    #[error("field '{0}' holds a list; append entries instead")]
    NotAScalar(Field),
    #[error("invalid date '{0}' (expected dd/mm/yyyy)")]
    InvalidDate(String),
    #[error("invalid checklist '{0}' (expected 4 comma-separated flags)")]
    InvalidChecklist(String),
    #[error("invalid entry for '{field}': '{raw}'")]
    InvalidItem { field: Field, raw: String },
}

/// A new value for one field, typed per field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(TextField, String),
    ReportDate(Option<NaiveDate>),
    Personnel(Vec<PersonnelEntry>),
    Equipment(Vec<EquipmentEntry>),
    SafetyChecklist(SafetyChecklist),
    ProgressPhotos(Vec<ProgressPhoto>),
}

impl FieldValue {
    /// The field this value is stored in.
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Text(t, _) => Field::Text(*t),
            FieldValue::ReportDate(_) => Field::ReportDate,
            FieldValue::Personnel(_) => Field::Personnel,
            FieldValue::Equipment(_) => Field::Equipment,
            FieldValue::SafetyChecklist(_) => Field::SafetyChecklist,
            FieldValue::ProgressPhotos(_) => Field::ProgressPhotos,
        }
    }
}

/// An entry appended to one of the list fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListItem {
    Personnel(PersonnelEntry),
    Equipment(EquipmentEntry),
    ProgressPhoto(ProgressPhoto),
}

impl ListItem {
    pub fn field(&self) -> Field {
        match self {
            ListItem::Personnel(_) => Field::Personnel,
            ListItem::Equipment(_) => Field::Equipment,
            ListItem::ProgressPhoto(_) => Field::ProgressPhotos,
        }
    }
}

/// The three supported transitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    SetField(FieldValue),
    AddItem(ListItem),
    Reset,
}

impl FormAction {
    pub fn set_text(field: TextField, value: impl Into<String>) -> Self {
        FormAction::SetField(FieldValue::Text(field, value.into()))
    }

    pub fn set_date(date: Option<NaiveDate>) -> Self {
        FormAction::SetField(FieldValue::ReportDate(date))
    }

    /// Build a `SetField` action from a field identifier and raw text.
    ///
    /// Dates accept `dd/mm/yyyy` or `yyyy-mm-dd`; an empty string clears the
    /// date. The checklist accepts four comma-separated flags (`1`/`0`,
    /// `true`/`false`, `x`/empty).
    pub fn set_from_str(key: &str, raw: &str) -> Result<Self, FormError> {
        let field = Field::from_key(key).ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        let value = match field {
            Field::Text(t) => FieldValue::Text(t, raw.to_string()),
            Field::ReportDate => FieldValue::ReportDate(parse_date(raw)?),
            Field::SafetyChecklist => FieldValue::SafetyChecklist(parse_checklist(raw)?),
            Field::Personnel | Field::Equipment | Field::ProgressPhotos => {
                return Err(FormError::NotAScalar(field));
            }
        };
        Ok(FormAction::SetField(value))
    }

    /// Build an `AddItem` action from a field identifier and raw text.
    ///
    /// Personnel and equipment entries are `;`-separated
    /// (`nome;cargo;horas`, `nome;quantidade;condicao`); missing trailing
    /// parts are left empty. Photos take a file path.
    pub fn add_from_str(key: &str, raw: &str) -> Result<Self, FormError> {
        let field = Field::from_key(key).ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        let item = match field {
            Field::Personnel => {
                let [name, role, hours] = split_entry(field, raw)?;
                ListItem::Personnel(PersonnelEntry::new(name, role, hours))
            }
            Field::Equipment => {
                let [name, quantity, condition] = split_entry(field, raw)?;
                ListItem::Equipment(EquipmentEntry::new(name, quantity, condition))
            }
            Field::ProgressPhotos => {
                let path = raw.trim();
                if path.is_empty() {
                    return Err(FormError::InvalidItem {
                        field,
                        raw: raw.to_string(),
                    });
                }
                ListItem::ProgressPhoto(ProgressPhoto(path.into()))
            }
            _ => return Err(FormError::NotAList(field)),
        };
        Ok(FormAction::AddItem(item))
    }
}

/// Parse a date as typed into the form. Empty input clears the date.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map(Some)
        .map_err(|_| FormError::InvalidDate(raw.to_string()))
}

fn parse_checklist(raw: &str) -> Result<SafetyChecklist, FormError> {
    let invalid = || FormError::InvalidChecklist(raw.to_string());
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != CHECKLIST_ITEMS {
        return Err(invalid());
    }
    let mut checklist = [false; CHECKLIST_ITEMS];
    for (slot, part) in checklist.iter_mut().zip(parts) {
        *slot = match part.to_ascii_lowercase().as_str() {
            "1" | "true" | "x" | "sim" => true,
            "0" | "false" | "" | "nao" | "não" => false,
            _ => return Err(invalid()),
        };
    }
    Ok(checklist)
}

fn split_entry(field: Field, raw: &str) -> Result<[String; 3], FormError> {
    let parts: Vec<&str> = raw.split(';').map(str::trim).collect();
    if parts.len() > 3 {
        return Err(FormError::InvalidItem {
            field,
            raw: raw.to_string(),
        });
    }
    let part = |i: usize| parts.get(i).map(|s| s.to_string()).unwrap_or_default();
    Ok([part(0), part(1), part(2)])
}

/// Apply one action to a draft.
///
/// Replacing the personnel or equipment list with an empty list leaves a
/// single blank entry, since those lists are never empty.
pub fn reduce(mut draft: ReportDraft, action: FormAction) -> ReportDraft {
    match action {
        FormAction::SetField(value) => match value {
            FieldValue::Text(field, text) => *draft.text_mut(field) = text,
            FieldValue::ReportDate(date) => draft.report_date = date,
            FieldValue::Personnel(list) => {
                draft.personnel = list;
                draft.ensure_list_entries();
            }
            FieldValue::Equipment(list) => {
                draft.equipment = list;
                draft.ensure_list_entries();
            }
            FieldValue::SafetyChecklist(checklist) => draft.safety_checklist = checklist,
            FieldValue::ProgressPhotos(photos) => draft.progress_photos = photos,
        },
        FormAction::AddItem(item) => match item {
            ListItem::Personnel(entry) => draft.personnel.push(entry),
            ListItem::Equipment(entry) => draft.equipment.push(entry),
            ListItem::ProgressPhoto(photo) => draft.progress_photos.push(photo),
        },
        FormAction::Reset => return ReportDraft::default(),
    }
    draft
}

// ── FormStore ─────────────────────────────────────────────────────────

/// Owns a draft and its completion percentage.
///
/// Progress is recomputed from the new state after every dispatch.
#[derive(Debug, Clone)]
pub struct FormStore {
    draft: ReportDraft,
    progress: f64,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::from_draft(ReportDraft::default())
    }
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_draft(mut draft: ReportDraft) -> Self {
        draft.ensure_list_entries();
        let progress = progress(&draft);
        Self { draft, progress }
    }

    pub fn dispatch(&mut self, action: FormAction) {
        trace!("form action: {action:?}");
        let draft = std::mem::take(&mut self.draft);
        self.draft = reduce(draft, action);
        self.progress = progress(&self.draft);
    }

    pub fn state(&self) -> &ReportDraft {
        &self.draft
    }

    /// Completion percentage of the current draft, in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }
}
