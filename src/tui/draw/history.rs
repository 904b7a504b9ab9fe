//! Chat transcript rendering: every message goes through the segmentation
//! and markup pipeline at draw time.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use super::super::app::{App, ChatMessage, MessageLog, View};
use super::super::constants::{ACCENT, ACCENT_SECONDARY, THINKING_FRAMES};
use super::super::math;
use super::super::syntax;
use super::super::text::{
    MarkupNode, MessageSegment, parse_markup, split_segments, wrap_message, wrap_spans,
};

fn push_multiline(
    current: &mut Vec<Span<'static>>,
    raw_lines: &mut Vec<Vec<Span<'static>>>,
    text: &str,
    style: Style,
) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            raw_lines.push(std::mem::take(current));
        }
        if !part.is_empty() {
            current.push(Span::styled(part.to_string(), style));
        }
    }
}

/// Lay out one prose run: markup nodes flow into lines, display math gets
/// its own indented lines, and everything wraps to `width`.
pub(super) fn markup_lines(text: &str, width: usize) -> Vec<Line<'static>> {
    let mut raw_lines: Vec<Vec<Span<'static>>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for node in parse_markup(text) {
        match node {
            MarkupNode::Text(t) => {
                push_multiline(&mut current, &mut raw_lines, t, Style::default());
            }
            MarkupNode::Bold(t) => {
                push_multiline(
                    &mut current,
                    &mut raw_lines,
                    t,
                    Style::default().add_modifier(Modifier::BOLD),
                );
            }
            MarkupNode::InlineMath(t) => current.push(math::inline_math_span(t)),
            MarkupNode::DisplayMath(t) => {
                if !current.is_empty() {
                    raw_lines.push(std::mem::take(&mut current));
                }
                let span = math::display_math_span(t);
                for line in span.content.split('\n') {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    raw_lines.push(vec![
                        Span::raw("    ".to_string()),
                        Span::styled(line.to_string(), span.style),
                    ]);
                }
            }
        }
    }
    if !current.is_empty() {
        raw_lines.push(current);
    }

    raw_lines
        .into_iter()
        .flat_map(|spans| wrap_spans(spans, width))
        .map(Line::from)
        .collect()
}

fn code_block_lines(lang: &str, code: &str, width: usize) -> Vec<Line<'static>> {
    let border = Style::default().fg(Color::DarkGray);
    let label = if lang.is_empty() { "code" } else { lang };
    let mut lines = vec![Line::from(Span::styled(
        format!("┌─ {}", label),
        border,
    ))];
    for spans in syntax::highlight_block(lang, code) {
        for chunk in wrap_spans(spans, width.saturating_sub(2)) {
            let mut row = vec![Span::styled("│ ".to_string(), border)];
            row.extend(chunk);
            lines.push(Line::from(row));
        }
    }
    lines.push(Line::from(Span::styled("└─".to_string(), border)));
    lines
}

fn assistant_lines(content: &str, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for segment in split_segments(content) {
        match segment {
            MessageSegment::Text(text) => lines.extend(markup_lines(text, width)),
            MessageSegment::CodeBlock { lang, code } => {
                lines.extend(code_block_lines(lang, code, width));
            }
        }
    }
    lines
}

fn label_line(label: &str, color: Color, timestamp: Option<u64>) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{} ", label),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(unix_secs) = timestamp {
        let hour = (unix_secs % 86400) / 3600;
        let min = (unix_secs % 3600) / 60;
        spans.push(Span::styled(
            format!("{:02}:{:02}", hour, min),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn build_lines(
    log: &MessageLog,
    width: usize,
    show_timestamps: bool,
    thinking_frame: usize,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, msg) in log.messages.iter().enumerate() {
        let timestamp = if show_timestamps {
            log.timestamps.get(idx).copied().flatten()
        } else {
            None
        };
        match msg {
            ChatMessage::User(s) => {
                lines.push(label_line("You", Color::DarkGray, timestamp));
                for chunk in wrap_message(s, width.saturating_sub(2)) {
                    lines.push(Line::from(Span::raw(format!("  {}", chunk))));
                }
                lines.push(Line::default());
            }
            ChatMessage::Assistant(s) => {
                lines.push(label_line("NALA", ACCENT, timestamp));
                if s.starts_with("Error:") {
                    for chunk in wrap_message(s, width.saturating_sub(2)) {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", chunk),
                            Style::default().fg(Color::Red),
                        )));
                    }
                } else {
                    for line in assistant_lines(s, width.saturating_sub(2)) {
                        let mut spans = vec![Span::raw("  ".to_string())];
                        spans.extend(line.spans);
                        lines.push(Line::from(spans));
                    }
                }
                lines.push(Line::default());
            }
            ChatMessage::Notice(s) => {
                for chunk in wrap_message(s, width.saturating_sub(2)) {
                    lines.push(Line::from(Span::styled(
                        format!("• {}", chunk),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
                lines.push(Line::default());
            }
            ChatMessage::Thinking => {
                let frame = THINKING_FRAMES[thinking_frame % THINKING_FRAMES.len()];
                lines.push(Line::from(Span::styled(
                    format!("{} Thinking...", frame),
                    Style::default()
                        .fg(ACCENT_SECONDARY)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }
    lines
}

pub(crate) fn draw_transcript(f: &mut Frame, app: &mut App, area: Rect, view: View) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let text_area = chunks[0];
    let scrollbar_area = chunks[1];
    let width = (text_area.width as usize).saturating_sub(1).max(10);

    let lines = {
        let log = match view {
            View::Tutor => &app.tutor_log,
            View::Challenge => &app.challenge_log,
        };
        build_lines(log, width, app.show_timestamps, app.thinking_frame)
    };

    let total = lines.len();
    let visible = text_area.height as usize;
    let max_scroll = total.saturating_sub(visible.max(1));
    app.last_max_scroll = max_scroll;
    let offset = app.scroll_from_bottom.min(max_scroll);
    let start = max_scroll - offset;
    let end = (start + visible).min(total);
    let visible_lines: Vec<Line> = lines
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();

    f.render_widget(Paragraph::new(visible_lines), text_area);

    let mut scrollbar_state = ScrollbarState::default()
        .position(start)
        .content_length(total);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_symbol("█")
        .thumb_style(Style::default().fg(ACCENT_SECONDARY))
        .track_symbol(Some("│"));
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}
