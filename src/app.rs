use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::AppConfig;
use crate::request::{self, RideRequest};
use crate::ui::sheet::{ActionSheet, Decision, SheetActions, SheetSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Sheet,
    Help,
}

pub struct App {
    pub popup: Popup,

    // Pending requests (read-only; we never edit what the caller gave us)
    pub requests: Vec<RideRequest>,
    pub selected: usize,

    // The open action sheet, if any (popup == Popup::Sheet)
    pub sheet: Option<ActionSheet>,

    // Where the requests came from, for reloading
    pub source: Option<PathBuf>,

    // Config
    pub config: AppConfig,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Info line content when there is no status to show
    pub info_message: Option<String>,
}

impl App {
    pub fn new(requests: Vec<RideRequest>, source: Option<PathBuf>, config: AppConfig) -> Self {
        let mut app = Self {
            popup: Popup::None,
            requests,
            selected: 0,
            sheet: None,
            source,
            config,
            status_message: None,
            status_message_time: None,
            info_message: None,
        };

        app.update_info_message();

        if app.config.auto_open {
            app.open_selected_sheet();
        }

        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key).await;
        }

        self.handle_normal_key(key).await
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Vertical navigation
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),

            // Open the action sheet for the selected request
            KeyCode::Enter | KeyCode::Char(' ') => self.open_selected_sheet(),

            // Reload requests from the source file
            KeyCode::Char('r') => self.reload(),

            // Help (? or h)
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    async fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc
                        | KeyCode::Char('?')
                        | KeyCode::Char('h')
                        | KeyCode::Enter
                        | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::Sheet => {
                let Some(sheet) = self.sheet.as_mut() else {
                    self.popup = Popup::None;
                    return Ok(());
                };

                match sheet.handle_key(key) {
                    SheetSignal::Open => {}
                    SheetSignal::Dismissed => self.close_sheet(),
                    SheetSignal::Decided(decision) => self.report_decision(decision),
                }
                Ok(())
            }
            Popup::None => Ok(()),
        }
    }

    fn move_down(&mut self) {
        if !self.requests.is_empty() {
            self.selected = (self.selected + 1) % self.requests.len();
        }
    }

    fn move_up(&mut self) {
        if !self.requests.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.requests.len() - 1);
        }
    }

    /// Open the bottom sheet for the selected request. The handlers stay
    /// unwired: there is no dispatcher behind this console, so accepting or
    /// declining only logs the press.
    fn open_selected_sheet(&mut self) {
        if let Some(request) = self.requests.get(self.selected).cloned() {
            let actions = SheetActions::new(
                || tracing::debug!("accept pressed; no dispatcher wired"),
                || tracing::debug!("decline pressed; no dispatcher wired"),
            );
            self.sheet = Some(ActionSheet::open(&request, actions));
            self.popup = Popup::Sheet;
        }
    }

    fn close_sheet(&mut self) {
        self.sheet = None;
        self.popup = Popup::None;
    }

    /// Caller-side handling of a sheet decision: dismiss the sheet and give
    /// presentational feedback. The dispatch effect itself stays behind
    /// `SheetActions`.
    fn report_decision(&mut self, decision: Decision) {
        // Report what the user actually saw: the sheet's snapshot, not the
        // (possibly since-changed) request
        let customer = self
            .sheet
            .as_ref()
            .map(|s| s.customer().to_string())
            .unwrap_or_else(|| request::UNKNOWN_CUSTOMER.to_string());

        self.close_sheet();

        let verb = match decision {
            Decision::Accepted => "Accepted",
            Decision::Declined => "Declined",
        };
        let message = format!("{} request from {}", verb, customer);

        if self.config.notifications {
            if let Err(e) = crate::notify("curbside", &message) {
                tracing::warn!("Notification failed: {}", e);
            }
        }

        self.set_status(message);
    }

    /// Reload requests from the source file, keeping the selection in range
    fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            self.set_status("No request file configured");
            return;
        };

        match request::load_requests(&path) {
            Ok(requests) => {
                self.set_status(format!("Loaded {} request(s)", requests.len()));
                self.requests = requests;
                if self.selected >= self.requests.len() {
                    self.selected = self.requests.len().saturating_sub(1);
                }
            }
            Err(e) => {
                self.set_status(format!("Reload failed: {}", e));
            }
        }
        self.update_info_message();
    }

    pub async fn tick(&mut self) -> Result<()> {
        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        self.update_info_message();
        Ok(())
    }

    fn update_info_message(&mut self) {
        self.info_message = match self.requests.len() {
            0 => Some("No ride requests".to_string()),
            1 => Some("1 ride request pending".to_string()),
            n => Some(format!("{} ride requests pending", n)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(requests: Vec<RideRequest>) -> App {
        let config = AppConfig {
            notifications: false, // no desktop notifications from tests
            ..Default::default()
        };
        App::new(requests, None, config)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[tokio::test]
    async fn enter_opens_the_sheet_for_the_selected_request() {
        let mut app = test_app(request::sample_requests());

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.popup, Popup::Sheet);
        assert!(app.sheet.is_some());
    }

    #[tokio::test]
    async fn enter_does_nothing_with_no_requests() {
        let mut app = test_app(Vec::new());

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.popup, Popup::None);
        assert!(app.sheet.is_none());
    }

    #[tokio::test]
    async fn esc_dismisses_the_sheet_without_a_status() {
        let mut app = test_app(request::sample_requests());

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.handle_key(key(KeyCode::Esc)).await.unwrap();

        assert_eq!(app.popup, Popup::None);
        assert!(app.sheet.is_none());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn accepting_closes_the_sheet_and_reports() {
        let mut app = test_app(request::sample_requests());

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.handle_key(key(KeyCode::Char('a'))).await.unwrap();

        assert_eq!(app.popup, Popup::None);
        assert!(app.sheet.is_none());
        let status = app.status_message.as_deref().unwrap();
        assert!(status.contains("Accepted"));
        assert!(status.contains("Alex"));
    }

    #[tokio::test]
    async fn declining_a_nameless_request_reports_unknown() {
        let mut app = test_app(vec![RideRequest::default()]);

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.handle_key(key(KeyCode::Char('d'))).await.unwrap();

        let status = app.status_message.as_deref().unwrap();
        assert!(status.contains("Declined"));
        assert!(status.contains("Unknown"));
    }

    #[tokio::test]
    async fn navigation_wraps_around_the_list() {
        let mut app = test_app(request::sample_requests());
        let count = app.requests.len();

        app.handle_key(key(KeyCode::Up)).await.unwrap();
        assert_eq!(app.selected, count - 1);

        app.handle_key(key(KeyCode::Down)).await.unwrap();
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn quit_key_is_swallowed_while_the_sheet_is_open() {
        // 'q' quits from the main loop only when no popup is open; while the
        // sheet is up it must not leak through as anything else either.
        let mut app = test_app(request::sample_requests());

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
        assert_eq!(app.popup, Popup::Sheet);
    }

    #[tokio::test]
    async fn reload_without_a_source_sets_a_status() {
        let mut app = test_app(request::sample_requests());

        app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
        assert_eq!(
            app.status_message.as_deref(),
            Some("No request file configured")
        );
    }

    #[test]
    fn auto_open_opens_the_first_sheet() {
        let config = AppConfig {
            notifications: false,
            auto_open: true,
            ..Default::default()
        };
        let app = App::new(request::sample_requests(), None, config);
        assert_eq!(app.popup, Popup::Sheet);
    }

    #[test]
    fn info_line_counts_pending_requests() {
        let app = test_app(request::sample_requests());
        assert_eq!(
            app.info_message.as_deref(),
            Some("3 ride requests pending")
        );

        let empty = test_app(Vec::new());
        assert_eq!(empty.info_message.as_deref(), Some("No ride requests"));
    }
}
