//! Terminal User Interface Module
//!
//! Interactive front end over the search and condense pipelines.
//! Built with Ratatui.
//!
//! # Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        📚 Research Paper Finder and Text Summarizer             │
//! ├─────────────────────────────────────────────┬───────────────────┤
//! │ machine learning optimization               │ ━━━━●───────  10  │
//! ├─────────────────────────────────────────────┴───────────────────┤
//! │ Title | Authors | Journal | DOI | Link | Published              │
//! │ ...                                                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Text to summarize                                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Summary                                                         │
//! └─────────────────────────────────────────────────────────────────┘
//!  Ready │ [Enter] Search [Ctrl+S] Summarize [Tab] Next [Ctrl+Q] Quit
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::{App, AppEvent, Focus, Status, View};
pub use event::{AppAction, EventHandler};

use crate::config::Config;
use crate::service::PaperService;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(config: Config, service: Arc<PaperService>) -> anyhow::Result<()> {
    info!("Starting TUI mode");

    let mut terminal = init_terminal()?;
    let mut app = App::new(service, &config.search);
    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Pick up finished searches and summaries
        app.poll_events();

        match events.next().await {
            Some(action) => app.handle_action(action).await,
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    info!("TUI exited normally");
    Ok(())
}
