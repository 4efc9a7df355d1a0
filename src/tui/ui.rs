//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::models::{CondenseMode, NormalizedRow};
use crate::tui::app::{App, Focus, Status, View};
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search form
            Constraint::Min(8),    // Results
            Constraint::Length(7), // Text input
            Constraint::Length(7), // Output
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_search_form(frame, chunks[1], app);
    render_results(frame, chunks[2], app);
    render_text_input(frame, chunks[3], app);
    render_output(frame, chunks[4], app);
    render_status_bar(frame, chunks[5], app);

    if app.view == View::Help {
        render_help(frame);
    }
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::raw("📚 "),
        Span::styled("Research Paper Finder", Theme::title()),
        Span::styled(" and Text Summarizer", Theme::text_secondary()),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Theme::border()));

    frame.render_widget(title, area);
}

fn render_search_form(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(36)])
        .split(area);

    let block = focused_block(" Research topic or keywords ", app.focus == Focus::Query);
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);
    frame.render_widget(&app.query, inner);

    let block = focused_block(" Number of papers ", app.focus == Focus::Limit);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);
    let slider = Paragraph::new(slider_line(
        app.limit,
        app.min_limit,
        app.max_limit,
        inner.width.saturating_sub(8) as usize,
    ));
    frame.render_widget(slider, inner);
}

/// Draw `value` as a horizontal bar between `min` and `max`
fn slider_line(value: u32, min: u32, max: u32, width: usize) -> Line<'static> {
    let span = max.saturating_sub(min).max(1) as usize;
    let filled = (value.saturating_sub(min) as usize * width) / span;
    let filled = filled.min(width);

    Line::from(vec![
        Span::styled("━".repeat(filled), Theme::selected()),
        Span::styled(Icons::ACTIVE, Theme::selected()),
        Span::styled("─".repeat(width - filled), Theme::text_dim()),
        Span::styled(format!(" {:>3}", value), Theme::heading()),
    ])
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Results ({}) ", app.rows.len());
    let block = focused_block(&title, app.focus == Focus::Results);

    if app.rows.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Press Enter in the search box to find papers",
            Theme::placeholder(),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let widths = [
        Constraint::Percentage(34),
        Constraint::Percentage(18),
        Constraint::Percentage(18),
        Constraint::Percentage(12),
        Constraint::Percentage(12),
        Constraint::Length(9),
    ];

    let header = Row::new(NormalizedRow::COLUMNS.map(|c| Cell::from(c)))
        .style(Theme::heading())
        .bottom_margin(1);

    // Cells wider than their column are clipped by the table widget
    let rows = app
        .rows
        .iter()
        .map(|row| Row::new(row.cells().map(Cell::from)).style(Theme::text()));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Theme::selected())
        .highlight_symbol(Icons::SELECTED);

    let mut state = app.table_state.clone();
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_text_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = focused_block(" Text to summarize ", app.focus == Focus::Text);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.text, inner);
}

fn render_output(frame: &mut Frame, area: Rect, app: &App) {
    let (title, body) = match &app.condensed {
        Some((CondenseMode::Summarize, text)) => (" Summary ", Span::styled(text.clone(), Theme::text())),
        Some((CondenseMode::Generate, text)) => (" Generated ", Span::styled(text.clone(), Theme::text())),
        None => (
            " Summary ",
            Span::styled("Ctrl+S summarizes the text above, Ctrl+G generates", Theme::placeholder()),
        ),
    };

    let paragraph = Paragraph::new(Line::from(body))
        .wrap(Wrap { trim: true })
        .block(focused_block(title, false));
    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match &app.status {
        Status::Ready => Span::styled("Ready", Theme::text_secondary()),
        Status::Searching => Span::styled("Searching for papers...", Theme::active()),
        Status::Condensing(CondenseMode::Summarize) => Span::styled("Summarizing text...", Theme::active()),
        Status::Condensing(CondenseMode::Generate) => Span::styled("Generating text...", Theme::active()),
        Status::Info(message) => Span::styled(message.clone(), Theme::success()),
        Status::Warning(message) => Span::styled(message.clone(), Theme::warning()),
        Status::Error(message) => Span::styled(message.clone(), Theme::error()),
    };

    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Search ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+S]", Theme::shortcut_key()),
        Span::styled(" Summarize ", Theme::shortcut_desc()),
        Span::styled("[Tab]", Theme::shortcut_key()),
        Span::styled(" Next ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let shortcut = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<13}", key), Theme::shortcut_key()),
            Span::styled(desc, Theme::text()),
        ])
    };

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
        shortcut("Enter", "Search (newline in the text box)"),
        shortcut("Tab/Shift+Tab", "Move between fields"),
        shortcut("←/→", "Adjust number of papers"),
        shortcut("↑/↓ PgUp/PgDn", "Scroll results"),
        shortcut("Ctrl+S", "Summarize text"),
        shortcut("Ctrl+G", "Generate from text"),
        shortcut("Ctrl+L", "Clear text and output"),
        shortcut("Esc", "Dismiss message"),
        shortcut("Ctrl+Q", "Quit application"),
        shortcut("F1", "Show this help"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
