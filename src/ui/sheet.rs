//! The ride request action sheet: a bottom-anchored modal overlay showing
//! one request with Decline/Accept buttons.
//!
//! The sheet snapshots its rows when opened and never re-reads the request,
//! so edits to the underlying data do not change what is on screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::request::RideRequest;
use crate::theme::Theme;

/// Total height of the sheet including its border
pub const SHEET_HEIGHT: u16 = 8;

/// Handlers for the two sheet actions, supplied by whoever opens the sheet.
/// The sheet invokes exactly one handler per button activation and does
/// nothing else with them.
pub struct SheetActions {
    on_accept: Box<dyn FnMut()>,
    on_decline: Box<dyn FnMut()>,
}

impl SheetActions {
    pub fn new(on_accept: impl FnMut() + 'static, on_decline: impl FnMut() + 'static) -> Self {
        Self {
            on_accept: Box::new(on_accept),
            on_decline: Box::new(on_decline),
        }
    }

    /// Handlers that do nothing. This is the integration point for a real
    /// dispatcher; until one is wired in, accepting or declining has no
    /// effect beyond what the caller does with the returned signal.
    #[allow(dead_code)]
    pub fn unwired() -> Self {
        Self::new(|| {}, || {})
    }

    fn accept(&mut self) {
        (self.on_accept)()
    }

    fn decline(&mut self) {
        (self.on_decline)()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetButton {
    Decline,
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Declined,
}

/// What the caller learns from forwarding a key press to the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSignal {
    /// Key consumed, sheet stays up
    Open,
    /// User closed the sheet without choosing (Esc); no handler ran
    Dismissed,
    /// A button was activated and its handler invoked. The sheet does not
    /// close itself; whether to dismiss is the caller's call.
    Decided(Decision),
}

pub struct ActionSheet {
    customer: String,
    pickup: String,
    dropoff: String,
    focused: SheetButton,
    actions: SheetActions,
}

impl ActionSheet {
    /// Open a sheet for `request`, capturing its rows as display text.
    pub fn open(request: &RideRequest, actions: SheetActions) -> Self {
        Self {
            customer: request.display_customer().to_string(),
            pickup: request.display_pickup().to_string(),
            dropoff: request.display_dropoff().to_string(),
            focused: SheetButton::Accept,
            actions,
        }
    }

    /// Customer row text as captured at open time
    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SheetSignal {
        match key.code {
            KeyCode::Esc => SheetSignal::Dismissed,

            KeyCode::Left => {
                self.focused = SheetButton::Decline;
                SheetSignal::Open
            }
            KeyCode::Right => {
                self.focused = SheetButton::Accept;
                SheetSignal::Open
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focused = match self.focused {
                    SheetButton::Decline => SheetButton::Accept,
                    SheetButton::Accept => SheetButton::Decline,
                };
                SheetSignal::Open
            }

            KeyCode::Enter | KeyCode::Char(' ') => self.activate(self.focused),
            KeyCode::Char('a') => self.activate(SheetButton::Accept),
            KeyCode::Char('d') => self.activate(SheetButton::Decline),

            // The sheet is modal: swallow everything else
            _ => SheetSignal::Open,
        }
    }

    fn activate(&mut self, button: SheetButton) -> SheetSignal {
        let decision = match button {
            SheetButton::Accept => {
                self.actions.accept();
                Decision::Accepted
            }
            SheetButton::Decline => {
                self.actions.decline();
                Decision::Declined
            }
        };
        SheetSignal::Decided(decision)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let sheet_area = super::bottom_sheet_area(area, SHEET_HEIGHT);

        f.render_widget(Clear, sheet_area);

        let block = Block::default()
            .title(Span::styled(
                " Ride Request ",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));

        let decline_style = if self.focused == SheetButton::Decline {
            Style::default()
                .fg(theme.danger)
                .bg(theme.bg_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.danger)
        };
        let accept_style = if self.focused == SheetButton::Accept {
            Style::default()
                .fg(theme.success)
                .bg(theme.bg_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.success)
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled(
                    &self.customer,
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  ○ ", Style::default().fg(theme.accent)),
                Span::styled(&self.pickup, Style::default().fg(theme.text)),
            ]),
            Line::from(vec![
                Span::styled("  ● ", Style::default().fg(theme.accent)),
                Span::styled(&self.dropoff, Style::default().fg(theme.text)),
            ]),
            Line::from(Span::styled(
                "─".repeat(sheet_area.width.saturating_sub(2) as usize),
                Style::default().fg(theme.inactive),
            )),
            Line::from(vec![
                Span::styled("[ Decline ]", decline_style),
                Span::raw("  "),
                Span::styled("[ Accept ]", accept_style),
                Span::raw("  "),
            ])
            .alignment(Alignment::Right),
            Line::from(vec![
                Span::styled("←/→", Style::default().fg(theme.accent)),
                Span::styled(" switch │ ", Style::default().fg(theme.text_dim)),
                Span::styled("Enter", Style::default().fg(theme.accent)),
                Span::styled(" select │ ", Style::default().fg(theme.text_dim)),
                Span::styled("a", Style::default().fg(theme.success)),
                Span::styled("/", Style::default().fg(theme.text_dim)),
                Span::styled("d", Style::default().fg(theme.danger)),
                Span::styled(" quick │ ", Style::default().fg(theme.text_dim)),
                Span::styled("Esc", Style::default().fg(theme.accent)),
                Span::styled(" close", Style::default().fg(theme.text_dim)),
            ])
            .alignment(Alignment::Center),
        ];

        let sheet = Paragraph::new(lines).block(block);
        f.render_widget(sheet, sheet_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use std::cell::Cell;
    use std::rc::Rc;

    fn sample_request() -> RideRequest {
        RideRequest {
            customer_name: Some("Alex".to_string()),
            pickup_address: Some("1 Main St".to_string()),
            dropoff_address: Some("2 Oak Ave".to_string()),
        }
    }

    fn counting_sheet(request: &RideRequest) -> (ActionSheet, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let accepts = Rc::new(Cell::new(0));
        let declines = Rc::new(Cell::new(0));
        let a = Rc::clone(&accepts);
        let d = Rc::clone(&declines);
        let sheet = ActionSheet::open(
            request,
            SheetActions::new(move || a.set(a.get() + 1), move || d.set(d.get() + 1)),
        );
        (sheet, accepts, declines)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn rendered_text(sheet: &ActionSheet, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| sheet.render(f, f.area(), &Theme::default()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let area = *buffer.area();
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn enter_activates_the_focused_button_once() {
        let request = sample_request();
        let (mut sheet, accepts, declines) = counting_sheet(&request);

        // Accept has focus by default
        let signal = sheet.handle_key(key(KeyCode::Enter));
        assert_eq!(signal, SheetSignal::Decided(Decision::Accepted));
        assert_eq!(accepts.get(), 1);
        assert_eq!(declines.get(), 0);
    }

    #[test]
    fn focus_switch_then_enter_declines() {
        let request = sample_request();
        let (mut sheet, accepts, declines) = counting_sheet(&request);

        assert_eq!(sheet.handle_key(key(KeyCode::Left)), SheetSignal::Open);
        let signal = sheet.handle_key(key(KeyCode::Enter));
        assert_eq!(signal, SheetSignal::Decided(Decision::Declined));
        assert_eq!(declines.get(), 1);
        assert_eq!(accepts.get(), 0);
    }

    #[test]
    fn tab_toggles_focus_both_ways() {
        let request = sample_request();
        let (mut sheet, _, declines) = counting_sheet(&request);

        sheet.handle_key(key(KeyCode::Tab));
        sheet.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(declines.get(), 1);
    }

    #[test]
    fn shortcut_keys_activate_directly() {
        let request = sample_request();
        let (mut sheet, accepts, declines) = counting_sheet(&request);

        assert_eq!(
            sheet.handle_key(key(KeyCode::Char('d'))),
            SheetSignal::Decided(Decision::Declined)
        );
        assert_eq!(
            sheet.handle_key(key(KeyCode::Char('a'))),
            SheetSignal::Decided(Decision::Accepted)
        );
        assert_eq!(accepts.get(), 1);
        assert_eq!(declines.get(), 1);
    }

    #[test]
    fn each_press_invokes_the_handler_again() {
        let request = sample_request();
        let (mut sheet, accepts, _) = counting_sheet(&request);

        sheet.handle_key(key(KeyCode::Enter));
        sheet.handle_key(key(KeyCode::Enter));
        assert_eq!(accepts.get(), 2);
    }

    #[test]
    fn esc_dismisses_without_invoking_handlers() {
        let request = sample_request();
        let (mut sheet, accepts, declines) = counting_sheet(&request);

        assert_eq!(sheet.handle_key(key(KeyCode::Esc)), SheetSignal::Dismissed);
        assert_eq!(accepts.get(), 0);
        assert_eq!(declines.get(), 0);
    }

    #[test]
    fn other_keys_are_swallowed() {
        let request = sample_request();
        let (mut sheet, accepts, declines) = counting_sheet(&request);

        assert_eq!(sheet.handle_key(key(KeyCode::Char('q'))), SheetSignal::Open);
        assert_eq!(sheet.handle_key(key(KeyCode::Up)), SheetSignal::Open);
        assert_eq!(accepts.get(), 0);
        assert_eq!(declines.get(), 0);
    }

    #[test]
    fn renders_all_rows_and_buttons() {
        let sheet = ActionSheet::open(&sample_request(), SheetActions::unwired());
        let text = rendered_text(&sheet, 80, 24);

        assert!(text.contains("Alex"));
        assert!(text.contains("1 Main St"));
        assert!(text.contains("2 Oak Ave"));
        assert!(text.contains("Decline"));
        assert!(text.contains("Accept"));
    }

    #[test]
    fn missing_fields_render_with_fallbacks() {
        let sheet = ActionSheet::open(&RideRequest::default(), SheetActions::unwired());
        let text = rendered_text(&sheet, 80, 24);

        assert!(text.contains("Unknown"));
        assert!(!text.contains("null"));
    }

    #[test]
    fn sheet_keeps_its_snapshot_when_the_request_changes() {
        let mut request = sample_request();
        let sheet = ActionSheet::open(&request, SheetActions::unwired());

        request.customer_name = Some("Bob".to_string());

        let text = rendered_text(&sheet, 80, 24);
        assert!(text.contains("Alex"));
        assert!(!text.contains("Bob"));
    }

    #[test]
    fn renders_on_a_small_terminal() {
        let sheet = ActionSheet::open(&sample_request(), SheetActions::unwired());
        // Should not panic even when the terminal is tiny
        let _ = rendered_text(&sheet, 30, 6);
    }
}
