mod chart;
mod header;
mod status;
mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::ui::AppState;
use crate::ui::ui_manager::RenderState;

use self::chart::render_chart;
use self::header::{render_header, render_stat_cards};
use self::status::render_status_bar;
use self::table::render_coin_table;

pub(super) fn render_root(frame: &mut Frame<'_>, app: &AppState, render_state: &RenderState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(frame.size());

    render_header(frame, chunks[0], app);
    render_stat_cards(frame, chunks[1], app);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    render_coin_table(frame, body_chunks[0], app);
    render_chart(frame, body_chunks[1], app);

    render_status_bar(frame, chunks[3], app, render_state);
}
