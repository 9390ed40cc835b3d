//! Status bar
//!
//! Shows the signed-in account, timeline progress, and either the last error
//! or the key hints for the current screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tootline_app::{App, FetchPhase, Screen};

const TIMELINE_HINTS: &str = "j/k move  g/G top/end  r reload  L logout  q quit";
const IDLE_HINTS: &str = "q quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (label, detail, hints) = match app.screen() {
        Screen::Starting => {
            (Span::styled("Starting", Style::default().fg(Color::Yellow)), String::new(), IDLE_HINTS)
        },
        Screen::Onboarding => {
            (Span::styled("Signed out", Style::default().fg(Color::Red)), String::new(), IDLE_HINTS)
        },
        Screen::Timeline(engine) => {
            let progress = match engine.phase() {
                FetchPhase::Empty => "not loaded".to_string(),
                FetchPhase::Loading if engine.posts().is_empty() => "loading".to_string(),
                _ if engine.is_exhausted() => format!("{} posts, end", engine.posts().len()),
                _ => format!("{} posts", engine.posts().len()),
            };
            (
                Span::styled(
                    engine.session().instance().to_string(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                format!(" | {progress}"),
                TIMELINE_HINTS,
            )
        },
    };

    let tail = app.status_message().map_or_else(
        || Span::styled(format!(" | {hints}"), Style::default().fg(Color::Gray)),
        |message| {
            Span::styled(
                format!(" | {message}"),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            )
        },
    );

    let status_line = Line::from(vec![Span::raw(" "), label, Span::raw(detail), tail]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
