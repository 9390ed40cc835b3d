//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples the timeline screen from the terminal library so key handling
/// can be exercised in simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Escape key (quit).
    Esc,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key (first post).
    Home,
    /// End key (last loaded post).
    End,
}
