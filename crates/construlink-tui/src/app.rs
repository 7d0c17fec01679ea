//! TUI-local state (not shared with the export driver).

use construlink::draft::{CHECKLIST_ITEMS, Field, ReportDraft, TextField};

/// Input mode for the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// Arrow keys move, `q` quits.
    Normal,
    /// Typing into the selected row; Enter commits, Esc cancels.
    Editing(FormRow),
}

/// Column of a personnel entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PersonnelPart {
    Name,
    Role,
    Hours,
}

/// Column of an equipment entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EquipmentPart {
    Name,
    Quantity,
    Condition,
}

/// One selectable line of the form screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FormRow {
    Text(TextField),
    Date,
    Personnel(usize, PersonnelPart),
    AddPersonnel,
    Equipment(usize, EquipmentPart),
    AddEquipment,
    Checklist(usize),
    AddPhoto,
    Submit,
}

/// Rows of the form screen for `draft`, in form order.
pub(crate) fn form_rows(draft: &ReportDraft) -> Vec<FormRow> {
    let mut rows = Vec::with_capacity(48);
    for field in Field::ALL {
        match field {
            Field::Text(t) => rows.push(FormRow::Text(t)),
            Field::ReportDate => rows.push(FormRow::Date),
            Field::Personnel => {
                for i in 0..draft.personnel.len() {
                    rows.extend([
                        FormRow::Personnel(i, PersonnelPart::Name),
                        FormRow::Personnel(i, PersonnelPart::Role),
                        FormRow::Personnel(i, PersonnelPart::Hours),
                    ]);
                }
                rows.push(FormRow::AddPersonnel);
            }
            Field::Equipment => {
                for i in 0..draft.equipment.len() {
                    rows.extend([
                        FormRow::Equipment(i, EquipmentPart::Name),
                        FormRow::Equipment(i, EquipmentPart::Quantity),
                        FormRow::Equipment(i, EquipmentPart::Condition),
                    ]);
                }
                rows.push(FormRow::AddEquipment);
            }
            Field::SafetyChecklist => rows.extend((0..CHECKLIST_ITEMS).map(FormRow::Checklist)),
            Field::ProgressPhotos => rows.push(FormRow::AddPhoto),
        }
    }
    rows.push(FormRow::Submit);
    rows
}

/// TUI-local state.
pub(crate) struct App {
    pub(crate) input_mode: InputMode,
    pub(crate) input_buffer: String,
    /// Selected card on the home screen.
    pub(crate) home_cursor: usize,
    /// Selected row on the form screen.
    pub(crate) form_cursor: usize,
    /// Whether the logs pane is visible (toggled with `,`).
    pub(crate) show_logs: bool,
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    /// Status messages shown temporarily at the bottom.
    pub(crate) status_message: Option<String>,
    pub(crate) should_quit: bool,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            home_cursor: 0,
            form_cursor: 0,
            show_logs: false,
            log_scroll: 0,
            status_message: None,
            should_quit: false,
        }
    }

    /// Leave editing and forget the typed text.
    pub(crate) fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }
}
