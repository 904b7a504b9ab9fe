//! Input bar.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::app::{App, View};
use super::super::constants::ACCENT;

pub(crate) fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let hint = match app.view {
        View::Tutor => "Enter send · Tab challenges · Esc cancel/quit",
        View::Challenge => "Enter submit answer · Tab tutor · Ctrl+R refresh",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = vec![Span::styled(
        "▸ ".to_string(),
        Style::default().fg(ACCENT),
    )];
    if app.input.is_empty() && !app.is_streaming {
        let placeholder = match app.view {
            View::Tutor => "Ask your tutor anything...",
            View::Challenge => "Type your answer to today's challenge...",
        };
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        // Show the tail that fits.
        let width = (inner.width as usize).saturating_sub(4);
        let chars: Vec<char> = app.input.chars().collect();
        let tail: String = if chars.len() > width {
            chars[chars.len() - width..].iter().collect()
        } else {
            app.input.clone()
        };
        spans.push(Span::raw(tail));
        if !app.is_streaming {
            spans.push(Span::styled("▌".to_string(), Style::default().fg(ACCENT)));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}
