//! Key handling.

use std::sync::{Arc, Mutex};

use construlink::draft::{EquipmentEntry, PersonnelEntry, ReportDraft};
use construlink::nav::{HOME_CARDS, Route};
use construlink::reducer::{FormAction, ListItem};
use construlink::ui::{self, UiState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, FormRow, InputMode, form_rows};
use crate::fields::{commit_edit, initial_buffer, is_multiline, toggle_checklist};

pub(crate) const EXPORTING_STATUS: &str = "Gerando PDF...";

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App, state: &Arc<Mutex<UiState>>) {
    // Ctrl+C always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // A notice blocks everything else until dismissed.
    let has_notice = state.lock().map(|s| s.notice.is_some()).unwrap_or(false);
    if has_notice {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            ui::dismiss_notice(state);
            app.status_message = None;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(key, app, state),
        InputMode::Editing(row) => handle_edit_key(key, row, app, state),
    }
}

/// Route, open draft and export flag, read in one lock.
fn snapshot(state: &Arc<Mutex<UiState>>) -> (Route, Option<ReportDraft>, bool) {
    state
        .lock()
        .map(|s| {
            (
                s.route,
                s.form.as_ref().map(|f| f.store().state().clone()),
                s.is_exporting(),
            )
        })
        .unwrap_or((Route::Home, None, false))
}

fn go_to(route: Route, app: &mut App, state: &Arc<Mutex<UiState>>) {
    let (current, _, exporting) = snapshot(state);
    if route == current {
        return;
    }
    if exporting {
        app.status_message = Some(EXPORTING_STATUS.into());
        return;
    }
    ui::navigate(state, route);
    app.home_cursor = 0;
    app.form_cursor = 0;
    app.status_message = None;
}

fn handle_normal_key(key: KeyEvent, app: &mut App, state: &Arc<Mutex<UiState>>) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char(',') => {
            app.show_logs = !app.show_logs;
            return;
        }
        KeyCode::Char('[') => {
            app.log_scroll = app.log_scroll.saturating_add(3);
            return;
        }
        KeyCode::Char(']') => {
            app.log_scroll = app.log_scroll.saturating_sub(3);
            return;
        }
        KeyCode::End => {
            app.log_scroll = 0; // follow tail
            return;
        }
        KeyCode::Char('h') => return go_to(Route::Home, app, state),
        KeyCode::Char('e') => return go_to(Route::Select, app, state),
        KeyCode::Char('n') => return go_to(Route::Notification, app, state),
        KeyCode::Char('p') => return go_to(Route::Profile, app, state),
        _ => {}
    }

    let (route, draft, _) = snapshot(state);
    match (route, draft) {
        (Route::Home, _) => handle_home_key(key, app, state),
        (Route::Form, Some(draft)) => handle_form_key(key, &draft, app, state),
        _ => {}
    }
}

fn handle_home_key(key: KeyEvent, app: &mut App, state: &Arc<Mutex<UiState>>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.home_cursor = app.home_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.home_cursor + 1 < HOME_CARDS.len() {
                app.home_cursor += 1;
            }
        }
        KeyCode::Enter => {
            if let Some(card) = HOME_CARDS.get(app.home_cursor) {
                go_to(card.route, app, state);
            }
        }
        _ => {}
    }
}

fn handle_form_key(
    key: KeyEvent,
    draft: &ReportDraft,
    app: &mut App,
    state: &Arc<Mutex<UiState>>,
) {
    let rows = form_rows(draft);
    let last = rows.len().saturating_sub(1);
    app.form_cursor = app.form_cursor.min(last);

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.form_cursor = app.form_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.form_cursor = (app.form_cursor + 1).min(last);
        }
        KeyCode::PageUp => {
            app.form_cursor = app.form_cursor.saturating_sub(10);
        }
        KeyCode::PageDown => {
            app.form_cursor = (app.form_cursor + 10).min(last);
        }
        KeyCode::Home => app.form_cursor = 0,
        KeyCode::Char('s') => submit(app, state),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(&row) = rows.get(app.form_cursor) {
                activate_row(row, draft, app, state);
            }
        }
        _ => {}
    }
}

fn activate_row(row: FormRow, draft: &ReportDraft, app: &mut App, state: &Arc<Mutex<UiState>>) {
    let exporting = state.lock().map(|s| s.is_exporting()).unwrap_or(false);
    if exporting {
        app.status_message = Some(EXPORTING_STATUS.into());
        return;
    }

    match row {
        FormRow::Submit => submit(app, state),
        FormRow::Checklist(i) => {
            if let Some(action) = toggle_checklist(draft, i) {
                ui::dispatch(state, action);
            }
        }
        FormRow::AddPersonnel => ui::dispatch(
            state,
            FormAction::AddItem(ListItem::Personnel(PersonnelEntry::default())),
        ),
        FormRow::AddEquipment => ui::dispatch(
            state,
            FormAction::AddItem(ListItem::Equipment(EquipmentEntry::default())),
        ),
        _ => {
            if let Some(text) = initial_buffer(row, draft) {
                app.input_buffer = text;
                app.input_mode = InputMode::Editing(row);
                app.status_message = None;
            }
        }
    }
}

fn submit(app: &mut App, state: &Arc<Mutex<UiState>>) {
    if ui::request_submit(state) {
        app.status_message = Some(EXPORTING_STATUS.into());
    }
}

fn handle_edit_key(key: KeyEvent, row: FormRow, app: &mut App, state: &Arc<Mutex<UiState>>) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) && is_multiline(row) => {
            app.input_buffer.push('\n');
        }
        KeyCode::Enter => {
            let (_, draft, _) = snapshot(state);
            let Some(draft) = draft else {
                app.cancel_edit();
                return;
            };
            match commit_edit(row, &draft, &app.input_buffer) {
                Ok(action) => {
                    if let Some(action) = action {
                        ui::dispatch(state, action);
                    }
                    app.cancel_edit();
                    app.status_message = None;
                }
                // Stay in the editor so the value can be corrected.
                Err(e) => app.status_message = Some(e.to_string()),
            }
        }
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use construlink::artifact::ArtifactStore;
    use construlink::draft::TextField;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, state: &Arc<Mutex<UiState>>, text: &str) {
        for c in text.chars() {
            handle_key_event(key(KeyCode::Char(c)), app, state);
        }
    }

    fn form_state(dir: &std::path::Path) -> Arc<Mutex<UiState>> {
        let state = Arc::new(Mutex::new(UiState::new(Arc::new(ArtifactStore::new(dir)))));
        ui::navigate(&state, Route::Form);
        state
    }

    fn draft(state: &Arc<Mutex<UiState>>) -> ReportDraft {
        snapshot(state).1.unwrap()
    }

    #[test]
    fn home_card_enter_opens_form() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(Mutex::new(UiState::new(Arc::new(ArtifactStore::new(
            dir.path(),
        )))));
        let mut app = App::new();

        handle_key_event(key(KeyCode::Down), &mut app, &state);
        handle_key_event(key(KeyCode::Down), &mut app, &state);
        handle_key_event(key(KeyCode::Enter), &mut app, &state);

        let s = state.lock().unwrap();
        assert_eq!(s.route, Route::Form);
        assert!(s.form.is_some());
    }

    #[test]
    fn nav_bar_keys_switch_screens() {
        let dir = tempfile::tempdir().unwrap();
        let state = form_state(dir.path());
        let mut app = App::new();

        handle_key_event(key(KeyCode::Char('p')), &mut app, &state);
        assert_eq!(state.lock().unwrap().route, Route::Profile);
        handle_key_event(key(KeyCode::Char('e')), &mut app, &state);
        assert_eq!(state.lock().unwrap().route, Route::Select);
        handle_key_event(key(KeyCode::Char('h')), &mut app, &state);
        assert_eq!(state.lock().unwrap().route, Route::Home);
    }

    #[test]
    fn typing_into_first_row_sets_report_number() {
        let dir = tempfile::tempdir().unwrap();
        let state = form_state(dir.path());
        let mut app = App::new();

        handle_key_event(key(KeyCode::Enter), &mut app, &state);
        assert_eq!(
            app.input_mode,
            InputMode::Editing(FormRow::Text(TextField::ReportNumber))
        );
        type_text(&mut app, &state, "RDO-12");
        handle_key_event(key(KeyCode::Enter), &mut app, &state);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(draft(&state).report_number, "RDO-12");
    }

    #[test]
    fn escape_discards_the_edit() {
        let dir = tempfile::tempdir().unwrap();
        let state = form_state(dir.path());
        let mut app = App::new();

        handle_key_event(key(KeyCode::Enter), &mut app, &state);
        type_text(&mut app, &state, "x");
        handle_key_event(key(KeyCode::Esc), &mut app, &state);
        assert_eq!(draft(&state).report_number, "");
    }

    #[test]
    fn invalid_date_keeps_editor_open() {
        let dir = tempfile::tempdir().unwrap();
        let state = form_state(dir.path());
        let mut app = App::new();

        handle_key_event(key(KeyCode::Down), &mut app, &state);
        handle_key_event(key(KeyCode::Enter), &mut app, &state);
        type_text(&mut app, &state, "99/99/2024");
        handle_key_event(key(KeyCode::Enter), &mut app, &state);

        assert_eq!(app.input_mode, InputMode::Editing(FormRow::Date));
        assert!(app.status_message.is_some());
        assert_eq!(draft(&state).report_date, None);
    }

    #[test]
    fn add_personnel_row_appends_entry() {
        let dir = tempfile::tempdir().unwrap();
        let state = form_state(dir.path());
        let mut app = App::new();
        let rows = form_rows(&draft(&state));
        app.form_cursor = rows
            .iter()
            .position(|r| *r == FormRow::AddPersonnel)
            .unwrap();

        handle_key_event(key(KeyCode::Enter), &mut app, &state);
        assert_eq!(draft(&state).personnel.len(), 2);
    }

    #[test]
    fn submit_locks_form_and_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let state = form_state(dir.path());
        let mut app = App::new();

        handle_key_event(key(KeyCode::Char('s')), &mut app, &state);
        assert!(state.lock().unwrap().is_exporting());
        assert_eq!(app.status_message.as_deref(), Some(EXPORTING_STATUS));

        handle_key_event(key(KeyCode::Char('h')), &mut app, &state);
        assert_eq!(state.lock().unwrap().route, Route::Form);

        handle_key_event(key(KeyCode::Enter), &mut app, &state);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn notice_blocks_input_until_dismissed() {
        let dir = tempfile::tempdir().unwrap();
        let state = form_state(dir.path());
        let mut app = App::new();
        ui::request_submit(&state);
        ui::request_submit(&state);
        assert!(state.lock().unwrap().notice.is_some());

        handle_key_event(key(KeyCode::Char('q')), &mut app, &state);
        assert!(!app.should_quit);
        handle_key_event(key(KeyCode::Enter), &mut app, &state);
        assert!(state.lock().unwrap().notice.is_none());
    }
}
