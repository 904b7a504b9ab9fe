//! Challenge side panel: today's challenge card and statistics.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::challenges::{Challenge, ChallengeStats, Difficulty};

use super::super::app::App;
use super::super::constants::ACCENT;
use super::history::markup_lines;

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn dim(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
}

fn challenge_lines(c: &Challenge, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Today's Challenge")];
    lines.push(Line::from(vec![
        Span::styled(
            c.difficulty.to_string(),
            Style::default()
                .fg(difficulty_color(c.difficulty))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {} · {}", c.category, c.date),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    if let Some(bloom) = &c.bloom_level {
        lines.push(dim(format!("Bloom: {}", bloom)));
    }
    lines.push(Line::default());
    // The question is model/author text: render it through the math pipeline.
    lines.extend(markup_lines(&c.question, width));
    lines.push(Line::default());

    if !c.attempts.is_empty() {
        let best = c.attempts.iter().map(|a| a.score).max().unwrap_or(0);
        lines.push(dim(format!(
            "Attempts: {} · Best: {}%",
            c.attempts.len(),
            best
        )));
        lines.push(Line::default());
    }
    lines
}

fn stats_lines(stats: &ChallengeStats) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Progress")];
    lines.push(dim(format!(
        "Streak: {} now · {} best",
        stats.current_streak, stats.longest_streak
    )));
    lines.push(dim(format!(
        "Solved: {} of {} attempted",
        stats.total_solved, stats.total_attempted
    )));
    lines.push(dim(format!(
        "Easy {}/{} · Med {}/{} · Hard {}/{}",
        stats.easy.solved,
        stats.easy.total,
        stats.medium.solved,
        stats.medium.total,
        stats.hard.solved,
        stats.hard.total
    )));
    lines.push(dim(format!("This month: {}", stats.monthly_attempts)));
    lines
}

pub(crate) fn draw_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = (inner.width as usize).saturating_sub(1).max(10);
    let mut lines: Vec<Line<'static>> = Vec::new();

    if let Some(err) = &app.challenge.fetch_error {
        lines.push(heading("Today's Challenge"));
        lines.push(Line::from(Span::styled(
            format!("unavailable: {}", err),
            Style::default().fg(Color::Red),
        )));
        lines.push(dim("Press Ctrl+R to retry.".to_string()));
    } else {
        match &app.challenge.challenge {
            Some(c) => lines.extend(challenge_lines(c, width)),
            None => {
                lines.push(heading("Today's Challenge"));
                lines.push(dim("No challenge today.".to_string()));
                lines.push(Line::default());
            }
        }
    }

    if let Some(stats) = &app.challenge.stats {
        lines.extend(stats_lines(stats));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
