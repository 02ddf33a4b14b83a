use ratatui::Frame;
use ratatui::layout::{Direction, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

use crate::ui::charts::ChartSeries;
use crate::ui::{AppState, format_compact};

const PALETTE: [Color; 5] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
];

pub(super) fn render_chart(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    let series = app.chart_series();
    let mut title = format!(" {} ", series.kind.title());
    if series.kind.log_scale() {
        title.push_str("(log) ");
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL);

    if series.is_empty() {
        let paragraph = Paragraph::new("No data to chart")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            Bar::default()
                .value(series.bar_height(point.value))
                .label(point.label.clone().into())
                .text_value(value_text(&series, point.value))
                .style(Style::default().fg(PALETTE[idx % PALETTE.len()]))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn value_text(series: &ChartSeries, value: f64) -> String {
    if series.kind.shows_share() {
        format!("{} ({:.1}%)", format_compact(value), series.share(value))
    } else {
        format_compact(value)
    }
}
