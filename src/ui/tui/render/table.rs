use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::ui::{AppState, format_compact, format_price};

pub(super) fn render_coin_table(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    let snapshot = &app.snapshot;
    let view = app.table.view(&snapshot.data);

    let title = if app.table.search().is_empty() {
        format!(
            " Markets (page {}/{}, {} per page) ",
            view.page + 1,
            view.page_count,
            app.table.rows_per_page()
        )
    } else {
        format!(
            " Markets matching \"{}\" ({} found, page {}/{}) ",
            app.table.search(),
            view.matched,
            view.page + 1,
            view.page_count
        )
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if snapshot.data.is_empty() {
        let (message, style) = if let Some(error) = &snapshot.error {
            (format!("Error: {}", error), Style::default().fg(Color::Red))
        } else if snapshot.loading {
            (
                "Loading market data...".to_string(),
                Style::default().fg(Color::Yellow),
            )
        } else {
            (
                "No market data yet".to_string(),
                Style::default().fg(Color::Gray),
            )
        };
        let paragraph = Paragraph::new(message)
            .style(style)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let widths = [
        Constraint::Length(5),
        Constraint::Min(14),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    let header = Row::new(["#", "Name", "Symbol", "Price", "24h %", "Mkt Cap", "Volume"]).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|coin| {
            let change_style = if coin.price_change_percentage_24h > 0.0 {
                Style::default().fg(Color::Green)
            } else if coin.price_change_percentage_24h < 0.0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(
                    coin.market_cap_rank
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(coin.name.clone()),
                Cell::from(coin.symbol.to_uppercase()),
                Cell::from(format_price(coin.current_price)),
                Cell::from(format!("{:+.2}%", coin.price_change_percentage_24h))
                    .style(change_style),
                Cell::from(format_compact(coin.market_cap)),
                Cell::from(format_compact(coin.total_volume)),
            ])
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    frame.render_widget(table, area);
}
