//! Form row labels, display values and edit commits.
//!
//! Rows edit through the same actions as every other front-end: a list
//! cell is committed by replacing the whole list with one entry changed,
//! a photo row appends, a date row goes through the date parser.

use construlink::draft::{Field, ReportDraft};
use construlink::reducer::{FieldValue, FormAction, FormError};

use crate::app::{EquipmentPart, FormRow, PersonnelPart};

pub(crate) fn row_label(row: FormRow) -> String {
    match row {
        FormRow::Text(t) => t.label().to_string(),
        FormRow::Date => format!("{} (dd/mm/aaaa)", Field::ReportDate.label()),
        FormRow::Personnel(i, part) => {
            let column = match part {
                PersonnelPart::Name => "Nome",
                PersonnelPart::Role => "Cargo",
                PersonnelPart::Hours => "Horas Trabalhadas",
            };
            format!("{} {} · {column}", Field::Personnel.label(), i + 1)
        }
        FormRow::AddPersonnel => "+ Adicionar efetivo".to_string(),
        FormRow::Equipment(i, part) => {
            let column = match part {
                EquipmentPart::Name => "Nome",
                EquipmentPart::Quantity => "Quantidade",
                EquipmentPart::Condition => "Condição",
            };
            format!("Equipamento {} · {column}", i + 1)
        }
        FormRow::AddEquipment => "+ Adicionar equipamento".to_string(),
        FormRow::Checklist(i) => format!("{} {}", Field::SafetyChecklist.label(), i + 1),
        FormRow::AddPhoto => format!("+ {}", Field::ProgressPhotos.label()),
        FormRow::Submit => "Gerar PDF".to_string(),
    }
}

fn personnel_cell(draft: &ReportDraft, i: usize, part: PersonnelPart) -> &str {
    draft.personnel.get(i).map_or("", |e| match part {
        PersonnelPart::Name => e.name.as_str(),
        PersonnelPart::Role => e.role.as_str(),
        PersonnelPart::Hours => e.hours_worked.as_str(),
    })
}

fn equipment_cell(draft: &ReportDraft, i: usize, part: EquipmentPart) -> &str {
    draft.equipment.get(i).map_or("", |e| match part {
        EquipmentPart::Name => e.name.as_str(),
        EquipmentPart::Quantity => e.quantity.as_str(),
        EquipmentPart::Condition => e.condition.as_str(),
    })
}

/// One-line value shown next to the label.
pub(crate) fn row_value(row: FormRow, draft: &ReportDraft) -> String {
    match row {
        FormRow::Text(t) => {
            let text = draft.text(t);
            let mut lines = text.lines();
            let first = lines.next().unwrap_or("");
            if lines.next().is_some() {
                format!("{first} …")
            } else {
                first.to_string()
            }
        }
        FormRow::Date => draft.formatted_date(),
        FormRow::Personnel(i, part) => personnel_cell(draft, i, part).to_string(),
        FormRow::Equipment(i, part) => equipment_cell(draft, i, part).to_string(),
        FormRow::Checklist(i) => {
            let checked = draft.safety_checklist.get(i).copied().unwrap_or(false);
            let mark = if checked { "[x]" } else { "[ ]" };
            mark.to_string()
        }
        FormRow::AddPhoto => format!("{} anexada(s)", draft.progress_photos.len()),
        FormRow::AddPersonnel | FormRow::AddEquipment | FormRow::Submit => String::new(),
    }
}

/// Text to pre-fill when editing starts, or `None` if the row is not a
/// text input.
pub(crate) fn initial_buffer(row: FormRow, draft: &ReportDraft) -> Option<String> {
    match row {
        FormRow::Text(t) => Some(draft.text(t).to_string()),
        FormRow::Date => Some(draft.formatted_date()),
        FormRow::Personnel(i, part) => Some(personnel_cell(draft, i, part).to_string()),
        FormRow::Equipment(i, part) => Some(equipment_cell(draft, i, part).to_string()),
        FormRow::AddPhoto => Some(String::new()),
        FormRow::AddPersonnel
        | FormRow::AddEquipment
        | FormRow::Checklist(_)
        | FormRow::Submit => None,
    }
}

/// Whether Alt+Enter inserts a newline while editing `row`.
pub(crate) fn is_multiline(row: FormRow) -> bool {
    matches!(row, FormRow::Text(t) if t.is_multiline())
}

/// Turn the edit buffer into an action for `row`.
pub(crate) fn commit_edit(
    row: FormRow,
    draft: &ReportDraft,
    buffer: &str,
) -> Result<Option<FormAction>, FormError> {
    let action = match row {
        FormRow::Text(t) => FormAction::set_text(t, buffer),
        FormRow::Date => FormAction::set_from_str(Field::ReportDate.key(), buffer)?,
        FormRow::Personnel(i, part) => {
            let mut list = draft.personnel.clone();
            let Some(entry) = list.get_mut(i) else {
                return Ok(None);
            };
            let cell = match part {
                PersonnelPart::Name => &mut entry.name,
                PersonnelPart::Role => &mut entry.role,
                PersonnelPart::Hours => &mut entry.hours_worked,
            };
            *cell = buffer.to_string();
            FormAction::SetField(FieldValue::Personnel(list))
        }
        FormRow::Equipment(i, part) => {
            let mut list = draft.equipment.clone();
            let Some(entry) = list.get_mut(i) else {
                return Ok(None);
            };
            let cell = match part {
                EquipmentPart::Name => &mut entry.name,
                EquipmentPart::Quantity => &mut entry.quantity,
                EquipmentPart::Condition => &mut entry.condition,
            };
            *cell = buffer.to_string();
            FormAction::SetField(FieldValue::Equipment(list))
        }
        FormRow::AddPhoto => FormAction::add_from_str(Field::ProgressPhotos.key(), buffer)?,
        FormRow::AddPersonnel
        | FormRow::AddEquipment
        | FormRow::Checklist(_)
        | FormRow::Submit => return Ok(None),
    };
    Ok(Some(action))
}

/// Action that flips checklist item `i`.
pub(crate) fn toggle_checklist(draft: &ReportDraft, i: usize) -> Option<FormAction> {
    let mut checklist = draft.safety_checklist;
    let item = checklist.get_mut(i)?;
    *item = !*item;
    Some(FormAction::SetField(FieldValue::SafetyChecklist(checklist)))
}
