//! Application State
//!
//! Contains the main application state and logic for the TUI.

use crate::config::SearchConfig;
use crate::display::NO_RESULTS;
use crate::models::{CondenseMode, NormalizedRow};
use crate::service::PaperService;
use crate::tui::event::AppAction;
use crate::types::AppResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tui_textarea::TextArea;

pub const DEFAULT_QUERY: &str = "machine learning optimization";
const QUERY_PLACEHOLDER: &str = "Enter your research topic or keywords";
const TEXT_PLACEHOLDER: &str = "Enter text to summarize";

/// Which input has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Query,
    Limit,
    Results,
    Text,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Query, Focus::Limit, Focus::Results, Focus::Text];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Main,
    Help,
}

/// Status line content
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Ready,
    Searching,
    Condensing(CondenseMode),
    Info(String),
    Warning(String),
    Error(String),
}

impl Status {
    pub fn is_busy(&self) -> bool {
        matches!(self, Status::Searching | Status::Condensing(_))
    }
}

/// Results delivered by background tasks
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished(AppResult<Vec<NormalizedRow>>),
    CondenseFinished(CondenseMode, AppResult<String>),
}

/// Main application state
pub struct App {
    service: Arc<PaperService>,

    // UI State
    pub view: View,
    pub focus: Focus,
    pub should_quit: bool,
    pub status: Status,

    // Search State
    pub query: TextArea<'static>,
    pub limit: u32,
    pub min_limit: u32,
    pub max_limit: u32,
    pub rows: Vec<NormalizedRow>,
    pub table_state: TableState,
    pub searching: bool,

    // Condense State
    pub text: TextArea<'static>,
    pub condensed: Option<(CondenseMode, String)>,
    pub condensing: Option<CondenseMode>,

    // Async communication
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    /// Create a new application instance
    pub fn new(service: Arc<PaperService>, search: &SearchConfig) -> Self {
        let mut query = TextArea::from([DEFAULT_QUERY]);
        query.set_cursor_line_style(ratatui::style::Style::default());
        query.set_placeholder_text(QUERY_PLACEHOLDER);
        query.move_cursor(tui_textarea::CursorMove::End);

        let text = Self::empty_text_area();

        let (event_tx, event_rx) = mpsc::channel(16);

        Self {
            service,
            view: View::Main,
            focus: Focus::Query,
            should_quit: false,
            status: Status::Ready,
            query,
            limit: search.default_rows,
            min_limit: search.min_rows,
            max_limit: search.max_rows,
            rows: Vec::new(),
            table_state: TableState::default(),
            searching: false,
            text,
            condensed: None,
            condensing: None,
            event_rx,
            event_tx,
        }
    }

    fn empty_text_area() -> TextArea<'static> {
        let mut text = TextArea::default();
        text.set_cursor_line_style(ratatui::style::Style::default());
        text.set_placeholder_text(TEXT_PLACEHOLDER);
        text
    }

    pub fn query_text(&self) -> String {
        self.query.lines().join(" ").trim().to_string()
    }

    pub fn input_text(&self) -> String {
        self.text.lines().join("\n").trim().to_string()
    }

    /// Poll for async events
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Handle a finished background task
    fn handle_event(&mut self, event: AppEvent) {
        match &event {
            AppEvent::SearchFinished(_) => self.searching = false,
            AppEvent::CondenseFinished(..) => self.condensing = None,
        }

        match event {
            AppEvent::SearchFinished(Ok(rows)) => {
                self.status = if rows.is_empty() {
                    Status::Warning(NO_RESULTS.to_string())
                } else {
                    Status::Info(format!("Found {} papers", rows.len()))
                };
                self.table_state = TableState::default();
                if !rows.is_empty() {
                    self.table_state.select(Some(0));
                }
                self.rows = rows;
            }
            AppEvent::SearchFinished(Err(e)) => {
                error!(error = %e, "Search failed");
                self.status = Status::Error(format!("Search failed: {}", e.cause()));
            }
            AppEvent::CondenseFinished(mode, Ok(text)) => {
                self.status = Status::Info(match mode {
                    CondenseMode::Summarize => "Summary ready".to_string(),
                    CondenseMode::Generate => "Generated text ready".to_string(),
                });
                self.condensed = Some((mode, text));
            }
            AppEvent::CondenseFinished(mode, Err(e)) => {
                error!(%mode, error = %e, "Condensing failed");
                let label = match mode {
                    CondenseMode::Summarize => "Summarization",
                    CondenseMode::Generate => "Generation",
                };
                self.status = Status::Error(format!("{} failed: {}", label, e.cause()));
            }
        }
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        if self.view == View::Help {
            // Any key closes help
            if !matches!(action, AppAction::Tick) {
                self.view = View::Main;
            }
            return;
        }

        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => match self.focus {
                Focus::Query | Focus::Limit | Focus::Results => self.submit_search(),
                Focus::Text => {
                    self.text.insert_newline();
                }
            },
            AppAction::Summarize => self.submit_condense(CondenseMode::Summarize),
            AppAction::Generate => self.submit_condense(CondenseMode::Generate),
            AppAction::ClearText => self.clear_text(),
            AppAction::ToggleHelp => {
                self.view = View::Help;
            }
            AppAction::Escape => {
                if !self.status.is_busy() {
                    self.status = Status::Ready;
                }
            }
            AppAction::NextField => {
                self.focus = self.focus.next();
            }
            AppAction::PrevField => {
                self.focus = self.focus.prev();
            }
            AppAction::ScrollPageUp => self.scroll_results(-10),
            AppAction::ScrollPageDown => self.scroll_results(10),
            AppAction::Input(key) => self.handle_input(key),
            AppAction::Tick => {}
        }
    }

    /// Route a key to whichever input has focus
    fn handle_input(&mut self, key: KeyEvent) {
        match self.focus {
            Focus::Query => match key.code {
                // Single-line field
                KeyCode::Up | KeyCode::Down => {}
                _ => {
                    self.query.input(key);
                }
            },
            Focus::Limit => match key.code {
                KeyCode::Left | KeyCode::Down | KeyCode::Char('-') => self.adjust_limit(-1),
                KeyCode::Right | KeyCode::Up | KeyCode::Char('+') => self.adjust_limit(1),
                KeyCode::Home => self.limit = self.min_limit,
                KeyCode::End => self.limit = self.max_limit,
                _ => {}
            },
            Focus::Results => match key.code {
                KeyCode::Up => self.scroll_results(-1),
                KeyCode::Down => self.scroll_results(1),
                _ => {}
            },
            Focus::Text => {
                self.text.input(key);
            }
        }
    }

    /// Move the limit slider, staying inside its range
    pub fn adjust_limit(&mut self, delta: i64) {
        let next = i64::from(self.limit) + delta;
        self.limit = next.clamp(i64::from(self.min_limit), i64::from(self.max_limit)) as u32;
    }

    fn scroll_results(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let last = self.rows.len() as isize - 1;
        let next = (current + delta).clamp(0, last);
        self.table_state.select(Some(next as usize));
    }

    /// Validate the query and start a background search
    pub fn submit_search(&mut self) {
        if self.searching {
            self.status = Status::Warning("A search is already running.".to_string());
            return;
        }

        let query = self.query_text();
        if query.is_empty() {
            self.status = Status::Warning("Please enter a search query.".to_string());
            return;
        }

        info!(query = %query, limit = self.limit, "Submitting search");
        self.searching = true;
        self.status = Status::Searching;

        let service = self.service.clone();
        let tx = self.event_tx.clone();
        let limit = self.limit;
        tokio::spawn(async move {
            let result = service.search(&query, limit).await;
            let _ = tx.send(AppEvent::SearchFinished(result)).await;
        });
    }

    /// Validate the text area and start a background condense call
    pub fn submit_condense(&mut self, mode: CondenseMode) {
        if let Some(running) = self.condensing {
            self.status = Status::Warning(format!("Still working on the last {} request.", running));
            return;
        }

        let text = self.input_text();
        if text.is_empty() {
            self.status = Status::Warning("Please enter text to summarize.".to_string());
            return;
        }

        info!(%mode, input_len = text.len(), "Submitting text");
        self.condensing = Some(mode);
        self.status = Status::Condensing(mode);

        let service = self.service.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = service.condense(&text, mode).await;
            let _ = tx.send(AppEvent::CondenseFinished(mode, result)).await;
        });
    }

    /// Clear the text area and last output
    pub fn clear_text(&mut self) {
        self.text = Self::empty_text_area();
        self.condensed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condenser::{testing::FakeLoader, TextCondenser};
    use crate::config::Config;
    use crate::models::Published;
    use crate::search::CrossRefClient;
    use crate::types::AppError;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let config = Config::default();
        let service = PaperService::new(
            CrossRefClient::new().with_base_url("http://127.0.0.1:9"),
            TextCondenser::new(Arc::new(FakeLoader::default()), "sum", "gen"),
        );
        App::new(Arc::new(service), &config.search)
    }

    fn key(code: KeyCode) -> AppAction {
        AppAction::Input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn row(title: &str) -> NormalizedRow {
        NormalizedRow {
            title: title.to_string(),
            authors: String::new(),
            journal: String::new(),
            doi: String::new(),
            link: String::new(),
            published: Published::Unknown,
        }
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Query.next(), Focus::Limit);
        assert_eq!(Focus::Text.next(), Focus::Query);
        assert_eq!(Focus::Query.prev(), Focus::Text);
    }

    #[tokio::test]
    async fn test_initial_state_mirrors_search_form() {
        let app = app();
        assert_eq!(app.query_text(), DEFAULT_QUERY);
        assert_eq!(app.limit, 10);
        assert_eq!(app.status, Status::Ready);
    }

    #[tokio::test]
    async fn test_limit_slider_is_clamped() {
        let mut app = app();
        app.focus = Focus::Limit;
        for _ in 0..100 {
            app.handle_action(key(KeyCode::Right)).await;
        }
        assert_eq!(app.limit, 50);
        for _ in 0..100 {
            app.handle_action(key(KeyCode::Left)).await;
        }
        assert_eq!(app.limit, 5);
    }

    #[tokio::test]
    async fn test_empty_query_warns_without_searching() {
        let mut app = app();
        app.query = TextArea::default();
        app.handle_action(AppAction::Submit).await;
        assert_eq!(app.status, Status::Warning("Please enter a search query.".to_string()));
    }

    #[tokio::test]
    async fn test_empty_text_warns_without_condensing() {
        let mut app = app();
        app.handle_action(AppAction::Summarize).await;
        assert_eq!(app.status, Status::Warning("Please enter text to summarize.".to_string()));
    }

    #[tokio::test]
    async fn test_condense_round_trip_through_channel() {
        let mut app = app();
        app.text = TextArea::from(["Transformers replaced recurrence with attention."]);
        app.handle_action(AppAction::Summarize).await;
        assert_eq!(app.status, Status::Condensing(CondenseMode::Summarize));

        let event = app.event_rx.recv().await.unwrap();
        app.handle_event(event);
        let (mode, text) = app.condensed.clone().unwrap();
        assert_eq!(mode, CondenseMode::Summarize);
        assert!(text.starts_with("[sum]"));
    }

    #[tokio::test]
    async fn test_search_runs_while_condensing() {
        let mut app = app();
        app.text = TextArea::from(["Attention is all you need."]);
        app.handle_action(AppAction::Summarize).await;
        assert_eq!(app.condensing, Some(CondenseMode::Summarize));

        app.handle_action(AppAction::Submit).await;
        assert!(app.searching);
        assert_eq!(app.status, Status::Searching);

        app.handle_action(AppAction::Submit).await;
        assert_eq!(app.status, Status::Warning("A search is already running.".to_string()));

        app.handle_action(AppAction::Generate).await;
        assert_eq!(
            app.status,
            Status::Warning("Still working on the last summarize request.".to_string())
        );

        for _ in 0..2 {
            let event = app.event_rx.recv().await.unwrap();
            app.handle_event(event);
        }
        assert!(!app.searching);
        assert_eq!(app.condensing, None);
    }

    #[tokio::test]
    async fn test_search_outcomes_update_status() {
        let mut app = app();

        app.handle_event(AppEvent::SearchFinished(Ok(Vec::new())));
        assert_eq!(app.status, Status::Warning(NO_RESULTS.to_string()));

        app.handle_event(AppEvent::SearchFinished(Err(AppError::Transport("HTTP error occurred: 500".into()))));
        assert_eq!(app.status, Status::Error("Search failed: HTTP error occurred: 500".to_string()));

        app.handle_event(AppEvent::SearchFinished(Ok(vec![row("a"), row("b")])));
        assert_eq!(app.rows.len(), 2);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_results_scrolling_stays_in_bounds() {
        let mut app = app();
        app.handle_event(AppEvent::SearchFinished(Ok(vec![row("a"), row("b"), row("c")])));
        app.focus = Focus::Results;
        app.handle_action(AppAction::ScrollPageDown).await;
        assert_eq!(app.table_state.selected(), Some(2));
        app.handle_action(key(KeyCode::Up)).await;
        assert_eq!(app.table_state.selected(), Some(1));
        app.handle_action(AppAction::ScrollPageUp).await;
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_help_closes_on_any_key() {
        let mut app = app();
        app.handle_action(AppAction::ToggleHelp).await;
        assert_eq!(app.view, View::Help);
        app.handle_action(key(KeyCode::Char('x'))).await;
        assert_eq!(app.view, View::Main);
    }
}
