//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O).

mod onboarding;
mod status;
mod timeline;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use tootline_app::{App, Screen};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(MAIN_AREA_MIN_HEIGHT), Constraint::Length(STATUS_HEIGHT)])
        .split(frame.area());

    let [main_area, status_area] = chunks.as_ref() else {
        return;
    };

    match app.screen() {
        Screen::Starting => onboarding::render_starting(frame, *main_area),
        Screen::Onboarding => onboarding::render(frame, *main_area),
        Screen::Timeline(engine) => timeline::render(frame, engine, app.selected(), *main_area),
    }
    status::render(frame, app, *status_area);
}
