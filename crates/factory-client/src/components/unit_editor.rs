// crates/factory-client/src/components/unit_editor.rs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use factory_core::validation::{MAX_NAME_LEN, MAX_NUMBER_COUNT, MAX_VALUE, MIN_VALUE};
use factory_core::SessionKind;

use crate::app::{App, FormField};

pub fn draw_unit_editor(f: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };
    let draft = session.draft();

    let title = format!(" {} ", app.form_title().unwrap_or_default());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Name
            Constraint::Length(2), // Children
            Constraint::Length(2), // Lower bound
            Constraint::Length(2), // Upper bound
            Constraint::Min(2),    // Validity
            Constraint::Length(1), // Actions
        ])
        .split(inner);

    let fields = [
        (FormField::Name, draft.name().to_string(), format!("1-{} chars", MAX_NAME_LEN - 1)),
        (
            FormField::NumberCount,
            draft.number_count().to_string(),
            format!("1-{}", MAX_NUMBER_COUNT),
        ),
        (
            FormField::MinValue,
            draft.min_value().to_string(),
            format!("{}-{}, below upper", MIN_VALUE, MAX_VALUE),
        ),
        (
            FormField::MaxValue,
            draft.max_value().to_string(),
            format!("{}-{}", MIN_VALUE, MAX_VALUE),
        ),
    ];

    for (chunk, (field, value, hint)) in chunks.iter().zip(fields) {
        let focused = field == app.focused_field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::styled(format!("{:<12}", field.label()), label_style),
            Span::styled(value, Style::default().fg(Color::Cyan)),
        ];
        if focused {
            spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
        }
        spans.push(Span::styled(format!("  ({})", hint), Style::default().fg(Color::DarkGray)));

        let widget = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(widget, *chunk);
    }

    let validity = if session.can_save() {
        Span::styled("ready to save", Style::default().fg(Color::Green))
    } else if !draft.is_valid() {
        Span::styled("invalid", Style::default().fg(Color::Red))
    } else {
        Span::styled("no changes", Style::default().fg(Color::Gray))
    };
    let mut status = vec![validity];
    if let Some(message) = &app.status_message {
        status.push(Span::raw("  "));
        status.push(Span::styled(message.as_str(), Style::default().fg(Color::Yellow)));
    }
    f.render_widget(Paragraph::new(Line::from(status)), chunks[4]);

    let actions_text = match session.kind() {
        SessionKind::Create => "[Enter] Create | [Esc] Cancel",
        SessionKind::Edit(_) => "[Enter] Save | [Ctrl+D] Delete | [Esc] Cancel",
    };
    let actions_widget = Paragraph::new(actions_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(actions_widget, chunks[5]);
}
