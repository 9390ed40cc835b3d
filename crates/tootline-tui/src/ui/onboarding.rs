//! Startup and sign-in screens.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the screen shown while the session is restored.
pub fn render_starting(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Restoring session…",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" tootline "));

    frame.render_widget(paragraph, area);
}

/// Render the sign-in instructions.
pub fn render(frame: &mut Frame, area: Rect) {
    let command = Style::default().fg(Color::Cyan);
    let lines = vec![
        Line::from(Span::styled(
            "Welcome to tootline",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("No session is active. Start tootline with your instance and an access token:"),
        Line::default(),
        Line::from(Span::styled("  tootline --instance mastodon.social --token <TOKEN>", command)),
        Line::default(),
        Line::from(vec![
            Span::raw("or set "),
            Span::styled("TOOTLINE_INSTANCE", command),
            Span::raw(" and "),
            Span::styled("TOOTLINE_TOKEN", command),
            Span::raw(". The token needs the read:statuses scope."),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Sign in "));

    frame.render_widget(paragraph, area);
}
