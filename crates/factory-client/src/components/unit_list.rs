// crates/factory-client/src/components/unit_list.rs

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::{App, InputMode};

pub fn draw_unit_list(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["ID", "Name", "Range", "Children", "Numbers"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let editing_id = app.session().and_then(|s| s.draft().id());

    let rows: Vec<Row> = app
        .controller
        .store()
        .snapshot()
        .into_iter()
        .enumerate()
        .map(|(i, unit)| {
            let mut style = if i == app.selected_index {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            if editing_id == Some(unit.id) {
                style = style.fg(Color::Yellow);
            }

            let numbers = unit
                .numbers
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(" ");

            Row::new(vec![
                Cell::from(unit.id.to_string()).style(style),
                Cell::from(unit.name.clone()).style(style.add_modifier(Modifier::BOLD)),
                Cell::from(format!("{}..{}", unit.min_value, unit.max_value)).style(style),
                Cell::from(unit.child_count_label()).style(style),
                Cell::from(numbers).style(style.fg(Color::Cyan)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),  // ID
        Constraint::Length(20), // Name
        Constraint::Length(11), // Range
        Constraint::Length(12), // Children
        Constraint::Min(10),    // Numbers
    ];

    let connection = app.controller.connection();
    let title = if connection.is_connected() {
        format!(" Units ({}) ", app.controller.store().len())
    } else {
        format!(" Units ({}, not live) ", app.controller.store().len())
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(
                if matches!(app.input_mode, InputMode::Normal) {
                    Color::Yellow
                } else {
                    Color::White
                },
            )),
    );

    f.render_widget(table, area);
}
