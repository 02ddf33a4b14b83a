use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::ui_manager::RenderState;
use crate::ui::{AppState, InputMode};

pub(super) fn render_status_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &AppState,
    render_state: &RenderState,
) {
    let snapshot = &app.snapshot;
    let mut lines = Vec::new();

    let notice = if matches!(app.input_mode, InputMode::Search) {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Cyan)),
            Span::raw(app.table.search().to_string()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ])
    } else if snapshot.pending_update_available {
        Line::from(Span::styled(
            format!(
                "New market data available ({} coins). Press 'u' or Enter to apply.",
                snapshot.pending_count
            ),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else if let Some(error) = &render_state.error_message {
        Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
    } else if let Some(error) = snapshot.last_error.as_ref().filter(|_| !snapshot.data.is_empty()) {
        Line::from(Span::styled(
            format!("Last refresh failed, showing previous data: {}", error),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            "q quit | / search | ←/→ page | r rows | Tab chart | u apply update",
            Style::default().fg(Color::Gray),
        ))
    };
    lines.push(notice);

    let metrics = &snapshot.metrics;
    let served = metrics
        .served_by
        .iter()
        .map(|(name, count)| format!("{}:{}", name, count))
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(Line::from(vec![
        Span::raw(format!(
            "Cycles {} (failed {}) | commits {} | deferred {} | p95 {} ms | {}",
            metrics.cycles_started,
            metrics.cycles_failed,
            metrics.commits,
            metrics.deferrals,
            metrics.latency_p95_ms,
            served
        )),
        Span::styled(
            if app.interacting { "  [holding]" } else { "" },
            Style::default().fg(Color::Magenta),
        ),
    ]));

    let block = Block::default().borders(Borders::ALL).title(" Status ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
