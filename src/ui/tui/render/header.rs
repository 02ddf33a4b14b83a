use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::session::RefreshPhase;
use crate::ui::AppState;

pub(super) fn render_header(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    let snapshot = &app.snapshot;

    let title = Span::styled(
        " CoinPulse Market Dashboard ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let phase = match snapshot.phase {
        RefreshPhase::Idle => Span::styled("● Idle ", Style::default().fg(Color::Gray)),
        RefreshPhase::Fetching => Span::styled("● Fetching ", Style::default().fg(Color::Yellow)),
        RefreshPhase::Committed => Span::styled("● Live ", Style::default().fg(Color::Green)),
        RefreshPhase::Deferred => Span::styled(
            "● Update held ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let updated = match snapshot.last_updated_at {
        Some(at) => format!("Updated {} UTC ", at.format("%H:%M:%S")),
        None => "Not updated yet ".to_string(),
    };

    let source = snapshot
        .source
        .map(|s| format!("Source: {} ", s))
        .unwrap_or_default();

    let body = vec![Line::from(vec![
        title,
        Span::raw(" "),
        phase,
        Span::raw(" "),
        Span::styled(updated, Style::default().fg(Color::Gray)),
        Span::styled(source, Style::default().fg(Color::Gray)),
    ])];

    let block = Block::default().borders(Borders::ALL).title(" Session ");

    let paragraph = Paragraph::new(body).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

pub(super) fn render_stat_cards(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    let stats = &app.statistics;
    let cards = [
        ("Coins", Some(app.snapshot.data.len())),
        ("Categories", stats.categories),
        ("Exchanges", stats.exchanges),
        ("Platforms", stats.asset_platforms),
        ("Indexes", stats.market_indexes),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, cards.len() as u32); 5])
        .split(area);

    for (chunk, (label, value)) in chunks.iter().zip(cards) {
        let value = value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let line = Line::from(vec![Span::styled(
            value,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )]);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", label));
        frame.render_widget(Paragraph::new(line).block(block), *chunk);
    }
}
