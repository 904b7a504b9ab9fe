//! Frame layout: header, active view, input bar.

mod challenge;
mod header;
mod history;
mod input;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use super::app::{App, View};
use super::constants::CHALLENGE_PANEL_WIDTH;

pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    header::draw_header(f, app, chunks[0]);

    match app.view {
        View::Tutor => history::draw_transcript(f, app, chunks[1], View::Tutor),
        View::Challenge => {
            let main = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Min(0),
                    Constraint::Length(CHALLENGE_PANEL_WIDTH),
                ])
                .split(chunks[1]);
            history::draw_transcript(f, app, main[0], View::Challenge);
            challenge::draw_panel(f, app, main[1]);
        }
    }

    input::draw_input(f, app, chunks[2]);
}
