use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::UiAction;
use crate::ui::{AppState, InputMode};

/// Handle keyboard events for TUI, returning actions for the UI manager
pub fn handle_key_event(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    if key_event.kind == KeyEventKind::Release {
        return UiAction::None;
    }

    // Global shortcuts first
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') | KeyCode::Char('d') = key_event.code {
            app.should_quit = true;
            return UiAction::QuitRequested;
        }
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode_keys(app, key_event),
        InputMode::Search => handle_search_mode_keys(app, key_event),
    }
}

fn handle_normal_mode_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            UiAction::QuitRequested
        }
        KeyCode::Char('/') => {
            app.enter_search_mode();
            UiAction::None
        }
        KeyCode::Esc => {
            app.table.clear_search();
            UiAction::None
        }
        KeyCode::Left => {
            app.previous_page();
            UiAction::None
        }
        KeyCode::Right => {
            app.next_page();
            UiAction::None
        }
        KeyCode::Tab => {
            app.next_chart();
            UiAction::None
        }
        KeyCode::BackTab => {
            app.previous_chart();
            UiAction::None
        }
        KeyCode::Char('r') => {
            app.table.cycle_rows_per_page();
            UiAction::None
        }
        KeyCode::Char('u') | KeyCode::Enter => UiAction::ApplyPendingUpdate,
        _ => UiAction::None,
    }
}

fn handle_search_mode_keys(app: &mut AppState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Esc => {
            app.table.clear_search();
            app.leave_search_mode();
            UiAction::None
        }
        KeyCode::Enter => {
            app.leave_search_mode();
            UiAction::None
        }
        KeyCode::Backspace => {
            app.table.pop_search_char();
            UiAction::None
        }
        KeyCode::Char(c) => {
            if !key_event.modifiers.contains(KeyModifiers::CONTROL) {
                app.table.push_search_char(c);
            }
            UiAction::None
        }
        _ => UiAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::charts::ChartKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = AppState::default();
        assert_eq!(handle_key_event(&mut app, press(KeyCode::Char('q'))), UiAction::QuitRequested);
        assert!(app.should_quit);

        let mut app = AppState::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(&mut app, ctrl_c), UiAction::QuitRequested);
    }

    #[test]
    fn test_apply_keys() {
        let mut app = AppState::default();
        assert_eq!(
            handle_key_event(&mut app, press(KeyCode::Char('u'))),
            UiAction::ApplyPendingUpdate
        );
        assert_eq!(
            handle_key_event(&mut app, press(KeyCode::Enter)),
            UiAction::ApplyPendingUpdate
        );
    }

    #[test]
    fn test_search_mode_editing() {
        let mut app = AppState::default();
        handle_key_event(&mut app, press(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);

        for c in "btc".chars() {
            handle_key_event(&mut app, press(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.table.search(), "bt");

        // Typing 'q' or 'u' while searching edits the query
        assert_eq!(handle_key_event(&mut app, press(KeyCode::Char('u'))), UiAction::None);
        assert_eq!(app.table.search(), "btu");

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.table.search(), "btu");

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert_eq!(app.table.search(), "");
    }

    #[test]
    fn test_chart_and_page_keys() {
        let mut app = AppState::default();
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.chart, ChartKind::VolumePie);
        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.chart, ChartKind::PriceBar);

        handle_key_event(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.table.rows_per_page(), 10);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = AppState::default();
        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(handle_key_event(&mut app, release), UiAction::None);
        assert!(!app.should_quit);
    }
}
