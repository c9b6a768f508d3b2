// crates/factory-client/src/components/help.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

const SHORTCUTS: &[(&str, Color, &str)] = &[
    ("N/n", Color::Green, "New unit"),
    ("Enter/e", Color::Cyan, "Edit selected unit"),
    ("D/d", Color::Red, "Delete selected unit"),
    ("↑/k", Color::White, "Move up"),
    ("↓/j", Color::White, "Move down"),
    ("Tab", Color::Blue, "Next field (form)"),
    ("Shift+Tab", Color::Blue, "Previous field (form)"),
    ("↑/↓ +/-", Color::Blue, "Step numeric field (form)"),
    ("Ctrl+D", Color::Red, "Delete unit (form)"),
    ("X/x", Color::Magenta, "Dismiss server error"),
    ("F1/?", Color::Gray, "Toggle help"),
    ("Q/q", Color::Red, "Quit"),
];

pub fn draw_help(f: &mut Frame, area: Rect) {
    f.render_widget(Clear, area);

    let help_items: Vec<ListItem> = SHORTCUTS
        .iter()
        .map(|(keys, color, action)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10}", keys), Style::default().fg(*color).add_modifier(Modifier::BOLD)),
                Span::raw(format!(" - {}", action)),
            ]))
        })
        .collect();

    let help_list = List::new(help_items).block(
        Block::default()
            .title(" Help - Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(help_list, area);

    let footer = Paragraph::new("Press F1 or ESC to close help")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    if area.height > 1 {
        let footer_area = Rect {
            x: area.x,
            y: area.y + area.height - 1,
            width: area.width,
            height: 1,
        };
        f.render_widget(footer, footer_area);
    }
}
