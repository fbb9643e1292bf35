pub mod sheet;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use std::sync::OnceLock;

use crate::app::{App, Popup};
use crate::theme::Theme;

// Load theme colors from system (Omarchy/Hyprland) once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

// Helper functions to get theme colors
fn accent() -> Color {
    theme().accent
}
fn warning() -> Color {
    theme().warning
}
fn text() -> Color {
    theme().text
}
fn text_dim() -> Color {
    theme().text_dim
}
fn bg_selected() -> Color {
    theme().bg_selected
}
fn inactive() -> Color {
    theme().inactive
}
fn header() -> Color {
    theme().header
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(4),    // Requests box
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_requests_box(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Sheet => {
            if let Some(sheet) = &app.sheet {
                sheet.render(f, area, theme());
            }
        }
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > info message > ready
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(warning())))
    } else if let Some(ref info) = app.info_message {
        Line::from(Span::styled(info, Style::default().fg(text_dim())))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(text_dim())))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_requests_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.popup == Popup::None;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let block = Block::default()
        .title(Span::styled(" Ride Requests ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    // Responsive columns based on width
    let show_dropoff = area.width > 60;

    let header_row = if show_dropoff {
        Row::new(vec![
            Span::styled("Customer", Style::default().fg(header())),
            Span::styled("Pickup", Style::default().fg(header())),
            Span::styled("Dropoff", Style::default().fg(header())),
        ])
    } else {
        Row::new(vec![
            Span::styled("Customer", Style::default().fg(header())),
            Span::styled("Pickup", Style::default().fg(header())),
        ])
    };

    let rows: Vec<Row> = if app.requests.is_empty() {
        vec![
            Row::new(vec![Span::styled(
                "  No ride requests",
                Style::default().fg(text_dim()),
            )]),
            Row::new(vec![Span::styled(
                "  Press 'r' to reload",
                Style::default().fg(accent()),
            )]),
        ]
    } else {
        app.requests
            .iter()
            .enumerate()
            .map(|(i, request)| {
                let row_style = if i == app.selected && is_active {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default()
                };

                if show_dropoff {
                    Row::new(vec![
                        Span::styled(request.display_customer(), Style::default().fg(text())),
                        Span::styled(request.display_pickup(), Style::default().fg(text_dim())),
                        Span::styled(request.display_dropoff(), Style::default().fg(text_dim())),
                    ])
                    .style(row_style)
                } else {
                    Row::new(vec![
                        Span::styled(request.display_customer(), Style::default().fg(text())),
                        Span::styled(request.display_pickup(), Style::default().fg(text_dim())),
                    ])
                    .style(row_style)
                }
            })
            .collect()
    };

    let widths = if show_dropoff {
        vec![
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ]
    } else {
        vec![Constraint::Percentage(40), Constraint::Percentage(60)]
    };

    let table = Table::new(rows, widths)
        .header(header_row.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.popup {
        Popup::None => vec![
            ("↑↓", "Nav"),
            ("Enter", "Review"),
            ("r", "Reload"),
            ("h", "Help"),
            ("q", "Quit"),
        ],
        Popup::Sheet => vec![
            ("←→", "Buttons"),
            ("Enter", "Select"),
            ("a", "Accept"),
            ("d", "Decline"),
            ("Esc", "Close"),
        ],
        Popup::Help => vec![("Esc", "Close")],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 50 { 3 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 70 { 95 } else { 60 },
        if area.height < 25 { 90 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "═══ Navigation ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", Style::default().fg(accent())),
            Span::raw("Move through the request list"),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", Style::default().fg(accent())),
            Span::raw("Open the action sheet for the selected request"),
        ]),
        Line::from(vec![
            Span::styled("  r         ", Style::default().fg(accent())),
            Span::raw("Reload requests from the source file"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Action Sheet ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  ←/→ Tab   ", Style::default().fg(accent())),
            Span::raw("Move between Decline and Accept"),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", Style::default().fg(accent())),
            Span::raw("Activate the focused button"),
        ]),
        Line::from(vec![
            Span::styled("  a / d     ", Style::default().fg(accent())),
            Span::raw("Accept / Decline directly"),
        ]),
        Line::from(vec![
            Span::styled("  Esc       ", Style::default().fg(accent())),
            Span::raw("Close the sheet without deciding"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Quick Start ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  curbside --request rides.json  ", Style::default().fg(accent())),
            Span::raw("Load requests from a file"),
        ]),
        Line::from(vec![
            Span::styled("  curbside --sample              ", Style::default().fg(accent())),
            Span::raw("Try it with built-in data"),
        ]),
        Line::from(vec![
            Span::styled("  curbside --check rides.json    ", Style::default().fg(accent())),
            Span::raw("Validate a file, print rows as JSON"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(
                    " curbside Help ",
                    Style::default().fg(accent()),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

/// Full-width area glued to the bottom edge, clamped to the terminal height
pub(crate) fn bottom_sheet_area(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect::new(
        area.x,
        area.y + area.height - height,
        area.width,
        height,
    )
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
