//! Rendering.

use std::sync::{Arc, Mutex};

use construlink::draft::ReportDraft;
use construlink::nav::{APP_TITLE, FOOTER, HOME_CARDS, NAV_ITEMS, Route};
use construlink::session::Notice;
use construlink::ui::{LogLevel, LogLine, UiState};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, FormRow, InputMode, form_rows};
use crate::fields::{is_multiline, row_label, row_value};

/// Map a log level to a ratatui [`Style`].
pub fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Trace => Style::default().fg(Color::DarkGray),
        LogLevel::Debug => Style::default().fg(Color::Cyan),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Progress as shown on the bar.
pub fn format_progress(progress: f64) -> String {
    format!("{progress:.0}%")
}

const ACCENT: Color = Color::Rgb(0xaf, 0x1b, 0x1b);

// ── Root Render ───────────────────────────────────────────────────────

/// Everything the frame needs, cloned under the lock so no widget is
/// built while `UiState` is held.
struct RenderSnapshot {
    route: Route,
    draft: Option<ReportDraft>,
    progress: f64,
    exporting: bool,
    notice: Option<Notice>,
    last_artifact_url: Option<String>,
    logs: Vec<LogLine>,
}

pub(crate) fn render(frame: &mut Frame, state: &Arc<Mutex<UiState>>, app: &App) {
    let snap = {
        let Ok(s) = state.lock() else {
            return;
        };
        RenderSnapshot {
            route: s.route,
            draft: s.form.as_ref().map(|f| f.store().state().clone()),
            progress: s.progress().unwrap_or(0.0),
            exporting: s.is_exporting(),
            notice: s.notice.clone(),
            last_artifact_url: s.last_artifact_url.clone(),
            logs: if app.show_logs {
                s.logs.clone()
            } else {
                Vec::new()
            },
        }
    };

    // [3] header | [flex] screen | [3] nav bar | [3] input bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], snap.route);

    let body = if app.show_logs {
        let mid = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_logs(frame, mid[1], &snap.logs, app);
        mid[0]
    } else {
        chunks[1]
    };

    match (snap.route, snap.draft.as_ref()) {
        (Route::Home, _) => render_home(frame, body, app),
        (Route::Form, Some(draft)) => render_form(frame, body, &snap, draft, app),
        (route, _) => render_placeholder(frame, body, route),
    }

    render_nav_bar(frame, chunks[2], snap.route);
    render_input(frame, chunks[3], app, snap.exporting);

    if let Some(ref notice) = snap.notice {
        render_notice(frame, notice);
    }
}

// ── Header & Nav Bar ──────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, route: Route) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {APP_TITLE} "),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("│ {}", route.label()),
            Style::default().fg(Color::Gray),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title_alignment(Alignment::Right)
        .title(" [p] Perfil ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_nav_bar(frame: &mut Frame, area: Rect, route: Route) {
    let keys = ['h', 'e', 'n', 'p'];
    let mut spans = Vec::with_capacity(NAV_ITEMS.len() * 2);
    for (item, key) in NAV_ITEMS.iter().zip(keys) {
        let style = if item.route == route {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" [{key}] {} ", item.label), style));
        spans.push(Span::raw("  "));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

// ── Home ──────────────────────────────────────────────────────────────

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (i, card) in HOME_CARDS.iter().enumerate() {
        let selected = i == app.home_cursor;
        let marker = if selected { "▸ " } else { "  " };
        let title_style = if selected {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(card.title, title_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", card.description),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(Span::styled(
        FOOTER,
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_placeholder(frame: &mut Frame, area: Rect, route: Route) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", route.label()));
    let text = Paragraph::new(format!("{}: em breve.", route.label()))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(text, area);
}

// ── Form ──────────────────────────────────────────────────────────────

fn render_form(
    frame: &mut Frame,
    area: Rect,
    snap: &RenderSnapshot,
    draft: &ReportDraft,
    app: &App,
) {
    // [3] progress | [1] last PDF | [flex] rows.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    let ratio = (snap.progress / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Relatório Diário de Obras "),
        )
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(ratio)
        .label(format_progress(snap.progress));
    frame.render_widget(gauge, chunks[0]);

    let artifact = match snap.last_artifact_url {
        Some(ref url) => format!(" Último PDF: {url}"),
        None => String::new(),
    };
    frame.render_widget(
        Paragraph::new(artifact).style(Style::default().fg(Color::Gray)),
        chunks[1],
    );

    let rows = form_rows(draft);
    let cursor = app.form_cursor.min(rows.len().saturating_sub(1));
    let editing = match app.input_mode {
        InputMode::Editing(row) => Some(row),
        InputMode::Normal => None,
    };

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, &row)| form_line(row, draft, i == cursor, editing == Some(row), snap.exporting))
        .collect();

    let inner_height = chunks[2].height.saturating_sub(2) as usize;
    let scroll = (cursor + 1).saturating_sub(inner_height);

    let border = if snap.exporting {
        Color::DarkGray
    } else {
        Color::Gray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, chunks[2]);
}

fn form_line(
    row: FormRow,
    draft: &ReportDraft,
    selected: bool,
    editing: bool,
    exporting: bool,
) -> Line<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let label_style = match (selected, row) {
        (_, FormRow::Submit) if exporting => Style::default().fg(Color::DarkGray),
        (true, _) => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        (false, FormRow::Submit) => Style::default().add_modifier(Modifier::BOLD),
        (false, _) => Style::default().fg(Color::Gray),
    };
    let label = match row {
        FormRow::Submit if exporting => "Gerando PDF...".to_string(),
        _ => row_label(row),
    };
    let value = if editing {
        "(editando)".to_string()
    } else {
        row_value(row, draft)
    };
    let mut spans = vec![Span::raw(marker), Span::styled(label, label_style)];
    if !value.is_empty() {
        spans.push(Span::raw(": "));
        spans.push(Span::raw(value));
    }
    Line::from(spans)
}

// ── Logs ──────────────────────────────────────────────────────────────

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = logs
        .iter()
        .filter(|log| !matches!(log.level, LogLevel::Trace | LogLevel::Debug))
        .map(|log| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", log.time),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{} ", log.level.label()),
                    log_level_style(log.level),
                ),
                Span::raw(log.message.as_str()),
            ])
        })
        .collect();

    let scroll = lines
        .len()
        .saturating_sub(inner_height)
        .saturating_sub(app.log_scroll);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ── Input Bar ─────────────────────────────────────────────────────────

fn render_input(frame: &mut Frame, area: Rect, app: &App, exporting: bool) {
    let (title, style, text) = match app.input_mode {
        InputMode::Normal => {
            let hint = match app.status_message {
                Some(ref msg) => msg.clone(),
                None if exporting => "Gerando PDF...".to_string(),
                None => "[q] sair  [,] logs  [Enter] editar  [s] gerar PDF".to_string(),
            };
            (
                format!(" {hint} "),
                Style::default().fg(Color::DarkGray),
                String::new(),
            )
        }
        InputMode::Editing(row) => {
            let newline_hint = if is_multiline(row) {
                "  [Alt+Enter] nova linha"
            } else {
                ""
            };
            let title = match app.status_message {
                Some(ref msg) => format!(" {msg} "),
                None => format!(
                    " {}: [Enter] confirmar  [Esc] cancelar{newline_hint} ",
                    row_label(row)
                ),
            };
            let text = format!("> {}█", app.input_buffer.replace('\n', " ⏎ "));
            (title, Style::default().fg(Color::Cyan), text)
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ── Notice ────────────────────────────────────────────────────────────

fn render_notice(frame: &mut Frame, notice: &Notice) {
    let area = centered(frame.area(), 44, 5);
    let color = if notice.is_failure() {
        Color::Red
    } else {
        Color::Green
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(" [Enter] OK ");
    let text = Paragraph::new(notice.text().to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(Clear, area);
    frame.render_widget(text, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use construlink::artifact::ArtifactStore;
    use construlink::draft::TextField;
    use construlink::nav::Navigator;
    use construlink::reducer::FormAction;
    use ratatui::backend::TestBackend;

    fn draw(state: &Arc<Mutex<UiState>>, app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|frame| render(frame, state, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn state_on(route: Route) -> Arc<Mutex<UiState>> {
        let mut state = UiState::new(Arc::new(ArtifactStore::new("unused")));
        state.navigate(route);
        Arc::new(Mutex::new(state))
    }

    #[test]
    fn progress_label_is_rounded_percent() {
        assert_eq!(format_progress(4.0 / 22.0 * 100.0), "18%");
        assert_eq!(format_progress(100.0), "100%");
    }

    #[test]
    fn home_shows_cards_nav_and_footer() {
        let screen = draw(&state_on(Route::Home), &App::new());
        assert!(screen.contains("ConstruLink"));
        assert!(screen.contains("Selecionar Empresa"));
        assert!(screen.contains("Notificações"));
        assert!(screen.contains("[p] Perfil"));
        assert!(screen.contains("Projeta. Todos os direitos reservados."));
    }

    #[test]
    fn form_shows_progress_and_fields() {
        let state = state_on(Route::Form);
        construlink::ui::dispatch(&state, FormAction::set_text(TextField::Company, "ACME"));
        let screen = draw(&state, &App::new());
        assert!(screen.contains("23%"));
        assert!(screen.contains("Número do RDO"));
        assert!(screen.contains("Empresa: ACME"));
    }

    #[test]
    fn placeholder_screens_render_their_title() {
        let screen = draw(&state_on(Route::Notification), &App::new());
        assert!(screen.contains("Notificações: em breve."));
    }

    #[test]
    fn notice_is_drawn_over_the_screen() {
        let state = state_on(Route::Form);
        state.lock().unwrap().notice = Some(Notice::Failure("Erro ao gerar PDF.".into()));
        let screen = draw(&state, &App::new());
        assert!(screen.contains("Erro ao gerar PDF."));
    }
}
