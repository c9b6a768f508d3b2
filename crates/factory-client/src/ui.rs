// crates/factory-client/src/ui.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::components::{
    help::draw_help,
    status_bar::draw_status_bar,
    unit_editor::draw_unit_editor,
    unit_list::draw_unit_list,
};
use crate::connection::ConnectionState;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Units + form
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    draw_header(f, chunks[0], app);
    draw_main_content(f, chunks[1], app);
    draw_status_bar(f, chunks[2], app);

    if let Some(error) = app.controller.connection().business_error() {
        let area = banner_rect(f.size());
        f.render_widget(Clear, area);
        let text = vec![
            Line::from(Span::styled(
                error.message.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{}  [x] dismiss", error.raised_at.format("%H:%M:%S")),
                Style::default().fg(Color::Gray),
            )),
        ];
        let banner = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Server refused ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        f.render_widget(banner, area);
    }

    if app.show_help {
        draw_help(f, centered_rect(60, 60, f.size()));
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(area);

    let connection = app.controller.connection();
    let (symbol, label, color) = match connection.state() {
        ConnectionState::Connected => ("✓", "Connected", Color::Green),
        ConnectionState::Connecting => ("…", "Connecting", Color::Yellow),
        ConnectionState::Disconnected => ("✗", "Disconnected", Color::Red),
    };

    let left_text = vec![
        Span::styled("Factories", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(" - "),
        Span::raw(format!("{} ", label)),
        Span::styled(symbol, Style::default().fg(color)),
        Span::styled(
            format!("  via {}", connection.preference()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let left_paragraph = Paragraph::new(Line::from(left_text))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(left_paragraph, header_chunks[0]);

    let online = connection
        .online_count()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let latency = connection
        .latency_ms()
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "-".to_string());
    let center_text = format!(
        "Online: {} | Ping: {} | Msgs: {}",
        online, latency, app.message_count
    );
    let center_paragraph = Paragraph::new(center_text)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(center_paragraph, header_chunks[1]);

    let right_paragraph = Paragraph::new("[F1]Help [n]New [q]Quit")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(right_paragraph, header_chunks[2]);
}

fn draw_main_content(f: &mut Frame, area: Rect, app: &App) {
    if app.session().is_none() {
        draw_unit_list(f, area, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_unit_list(f, chunks[0], app);
    draw_unit_editor(f, chunks[1], app);
}

fn banner_rect(r: Rect) -> Rect {
    let width = r.width.saturating_sub(4).min(70);
    Rect {
        x: r.x + (r.width.saturating_sub(width)) / 2,
        y: r.y + 3,
        width,
        height: 4.min(r.height.saturating_sub(3)),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
