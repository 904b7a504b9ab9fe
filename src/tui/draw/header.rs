//! Header: app identity, academic week, streak, and view tabs.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::app;
use crate::core::calendar;

use super::super::app::{App, View};
use super::super::constants::ACCENT;
use super::super::text::{MarkupNode, parse_bold_markup};

/// Render static header copy through the bold-only markup entry point, so a
/// stray dollar sign in a week label can never be read as math.
fn bold_copy_spans(copy: &str) -> Vec<Span<'static>> {
    parse_bold_markup(copy)
        .into_iter()
        .map(|node| match node {
            MarkupNode::Bold(t) => Span::styled(
                t.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            MarkupNode::Text(t)
            | MarkupNode::InlineMath(t)
            | MarkupNode::DisplayMath(t) => {
                Span::styled(t.to_string(), Style::default().fg(Color::Gray))
            }
        })
        .collect()
}

fn tab_span(label: &str, active: bool) -> Span<'static> {
    let style = if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {} ", label), style)
}

pub(crate) fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let today = chrono::Local::now().date_naive();
    let week_copy = match calendar::current_week(today) {
        Some(week) => {
            let range = calendar::format_week_range(today).unwrap_or_default();
            format!("**{}** · {}", week.name(), range)
        }
        None => "**Vacation** · no teaching week".to_string(),
    };
    let streak_copy = match &app.challenge.stats {
        Some(stats) => format!(
            "  **Streak** {} day{}",
            stats.current_streak,
            if stats.current_streak == 1 { "" } else { "s" }
        ),
        None => String::new(),
    };

    let mut title = vec![
        Span::styled(
            format!("◆ NALA Tutor {} ", app::VERSION),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {}  ", app.model_name),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    title.push(tab_span("Tutor", app.view == View::Tutor));
    title.push(tab_span("Challenges", app.view == View::Challenge));

    let mut info = bold_copy_spans(&week_copy);
    info.extend(bold_copy_spans(&streak_copy));

    f.render_widget(
        Paragraph::new(vec![Line::from(title), Line::from(info)]),
        area,
    );
}
