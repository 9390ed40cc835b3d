//! Home timeline list.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Paragraph},
};
use tootline_app::{FetchPhase, TimelineEngine};
use tootline_client::{Account, Post};

use crate::text::html_to_text;

/// Render the timeline of `engine` with row `selected` highlighted.
pub fn render(frame: &mut Frame, engine: &TimelineEngine, selected: usize, area: Rect) {
    let title = format!(" Home · {} ", engine.session().instance());
    let block = Block::default().borders(Borders::ALL).title(title);
    let dim = Style::default().fg(Color::DarkGray);

    let posts = engine.posts();
    if posts.is_empty() {
        let message = match engine.phase() {
            FetchPhase::Loading => "Loading timeline…",
            FetchPhase::Empty => "Timeline not loaded. Press r to load it.",
            FetchPhase::Loaded => "Your home timeline is empty.",
        };
        frame.render_widget(Paragraph::new(Span::styled(message, dim)).block(block), area);
        return;
    }

    let mut items: Vec<ListItem> = posts.iter().map(post_item).collect();
    if !engine.is_exhausted() {
        items.push(ListItem::new(Line::from(Span::styled("Loading more…", dim))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌ ")
        .highlight_spacing(HighlightSpacing::Always)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn post_item(post: &Post) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if let Some(booster) = post.booster() {
        lines.push(Line::from(Span::styled(format!("⟳ {} boosted", author_name(booster)), dim)));
    }

    let shown = post.display_post();
    let handle = shown.account.handle();
    let mut header = vec![
        Span::styled(
            author_name(&shown.account),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(handle.handle, dim),
    ];
    if let Some(server) = handle.server {
        header.push(Span::styled(server, dim));
    }
    lines.push(Line::from(header));

    if let Some(content) = &shown.content {
        lines.extend(html_to_text(content).lines().map(|line| Line::from(line.to_string())));
    }
    if let Some(images) = shown.image_attachments() {
        let noun = if images.len() == 1 { "image" } else { "images" };
        lines.push(Line::from(Span::styled(
            format!("[{} {noun}]", images.len()),
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(url) = shown.link_card_url() {
        lines.push(Line::from(Span::styled(
            format!("↗ {url}"),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )));
    }
    lines.push(Line::default());

    ListItem::new(lines)
}

fn author_name(account: &Account) -> String {
    account.display_name().map_or_else(|| account.handle().handle, str::to_string)
}
