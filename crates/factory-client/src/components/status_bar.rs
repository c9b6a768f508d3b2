// crates/factory-client/src/components/status_bar.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

pub fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let connection = app.controller.connection();

    // A transport error wins over the shortcut line until the next connect.
    let (msg, style) = if let Some(error) = connection.transport_error() {
        let line = vec![
            Span::styled("Connection: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(error, Style::default().fg(Color::Red)),
        ];
        (Line::from(line), Style::default().fg(Color::Red))
    } else {
        match app.input_mode {
            InputMode::Normal => {
                let mut shortcuts = vec![
                    Span::styled("[N]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("ew "),
                    Span::styled("[Enter]", Style::default().fg(Color::Cyan)),
                    Span::raw("Edit "),
                    Span::styled("[D]", Style::default().fg(Color::Red)),
                    Span::raw("elete "),
                    Span::styled("[Q]", Style::default().fg(Color::Gray)),
                    Span::raw("uit"),
                ];
                if let Some(message) = &app.status_message {
                    shortcuts.push(Span::raw("  "));
                    shortcuts.push(Span::styled(message.as_str(), Style::default().fg(Color::Yellow)));
                }
                (Line::from(shortcuts), Style::default())
            }
            InputMode::Editing => {
                let input = vec![
                    Span::raw("Editing "),
                    Span::styled(app.focused_field.label(), Style::default().fg(Color::Yellow)),
                    Span::raw(" [Tab] Next field [↑/↓ +/-] Step [Enter] Save [Esc] Cancel"),
                ];
                (Line::from(input), Style::default().fg(Color::Yellow))
            }
        }
    };

    let status_block = Block::default()
        .borders(Borders::ALL)
        .border_style(style);

    let paragraph = Paragraph::new(msg)
        .block(status_block)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
