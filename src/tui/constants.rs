//! TUI constants: colors and timing.

use ratatui::style::Color;

/// Accent — NALA brand indigo.
pub(super) const ACCENT: Color = Color::Rgb(129, 140, 248);

/// Secondary accent — soft cyan used for math and code.
pub(super) const ACCENT_SECONDARY: Color = Color::Rgb(126, 200, 227);

/// Event poll timeout in milliseconds (main loop).
pub(crate) const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Scroll amount for arrow keys.
pub(crate) const SCROLL_LINES_SMALL: usize = 3;

/// Scroll amount for PageUp/PageDown.
pub(crate) const SCROLL_LINES_PAGE: usize = 10;

/// Width of the challenge side panel.
pub(crate) const CHALLENGE_PANEL_WIDTH: u16 = 38;

/// Spinner frames for the "thinking" indicator.
pub(super) const THINKING_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸"];
