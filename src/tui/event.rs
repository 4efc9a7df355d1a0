//! Event Handling
//!
//! Handles keyboard and timer events for the TUI.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit
    ForceQuit,
    /// Enter key: search from the search form, newline in the text area
    Submit,
    /// Summarize the text area
    Summarize,
    /// Run the text area through the generation model
    Generate,
    /// Clear the text area and its output
    ClearText,
    /// Toggle help view
    ToggleHelp,
    /// Escape - dismiss the status message
    Escape,
    /// Scroll results up one page
    ScrollPageUp,
    /// Scroll results down one page
    ScrollPageDown,
    /// Move to next field (Tab)
    NextField,
    /// Move to previous field (Shift+Tab)
    PrevField,
    /// Any other key, routed by focus
    Input(KeyEvent),
    /// Timer tick for animations
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        // Spawn event polling task
        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = Self::map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }

    /// Map a crossterm event to an app action
    fn map_event(event: Event) -> Option<AppAction> {
        match event {
            // Windows reports both press and release
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::map_key_event(key),
            _ => None,
        }
    }

    /// Map a key event to an app action
    pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
        match (key.modifiers, key.code) {
            // Quit shortcuts
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),

            // Condense triggers
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(AppAction::Summarize),
            (KeyModifiers::CONTROL, KeyCode::Char('g')) => Some(AppAction::Generate),
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(AppAction::ClearText),

            (KeyModifiers::SHIFT, KeyCode::BackTab) => Some(AppAction::PrevField),

            (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => Some(AppAction::Escape),
                KeyCode::Enter => Some(AppAction::Submit),
                KeyCode::F(1) => Some(AppAction::ToggleHelp),
                KeyCode::PageUp => Some(AppAction::ScrollPageUp),
                KeyCode::PageDown => Some(AppAction::ScrollPageDown),
                KeyCode::Tab => Some(AppAction::NextField),
                KeyCode::BackTab => Some(AppAction::PrevField),
                _ => Some(AppAction::Input(key)),
            },

            // Pass through other key combinations as input
            _ => Some(AppAction::Input(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(modifiers: KeyModifiers, code: KeyCode) -> Option<AppAction> {
        EventHandler::map_key_event(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_shortcuts() {
        assert!(matches!(map(KeyModifiers::CONTROL, KeyCode::Char('s')), Some(AppAction::Summarize)));
        assert!(matches!(map(KeyModifiers::CONTROL, KeyCode::Char('g')), Some(AppAction::Generate)));
        assert!(matches!(map(KeyModifiers::CONTROL, KeyCode::Char('q')), Some(AppAction::Quit)));
        assert!(matches!(map(KeyModifiers::NONE, KeyCode::Enter), Some(AppAction::Submit)));
        assert!(matches!(map(KeyModifiers::NONE, KeyCode::Tab), Some(AppAction::NextField)));
        assert!(matches!(map(KeyModifiers::SHIFT, KeyCode::BackTab), Some(AppAction::PrevField)));
    }

    #[test]
    fn test_plain_characters_are_input() {
        assert!(matches!(
            map(KeyModifiers::NONE, KeyCode::Char('?')),
            Some(AppAction::Input(_))
        ));
        assert!(matches!(
            map(KeyModifiers::SHIFT, KeyCode::Char('A')),
            Some(AppAction::Input(_))
        ));
    }
}
