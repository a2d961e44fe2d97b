use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, FOCUS_SLOTS};
use crossterm::event::KeyCode;

const SCROLL_STEP: usize = 10;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Esc => {
            app.status_message.clear();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.focus_index = wrap_decrement(app.focus_index, FOCUS_SLOTS);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.focus_index = wrap_increment(app.focus_index, FOCUS_SLOTS);
        }
        KeyCode::Enter => {
            if app.focused_field().is_some() {
                app.open_picker();
            } else {
                app.submit();
            }
        }
        KeyCode::Char('g') => app.submit(),
        KeyCode::Left => app.previous_period(),
        KeyCode::Right => app.next_period(),
        KeyCode::PageDown => {
            app.table_offset = app.table_offset.saturating_add(SCROLL_STEP);
        }
        KeyCode::PageUp => {
            app.table_offset = app.table_offset.saturating_sub(SCROLL_STEP);
        }
        KeyCode::Backspace | KeyCode::Delete => app.clear_focused_field(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn app() -> App {
        let (tx, _rx) = unbounded_channel();
        App::new(tx)
    }

    #[test]
    fn focus_wraps_through_generate_button() {
        let mut app = app();
        handle_dashboard_input(&mut app, KeyCode::Up);
        assert_eq!(app.focus_index, FOCUS_SLOTS - 1);
        assert!(app.focused_field().is_none());
        handle_dashboard_input(&mut app, KeyCode::Down);
        assert_eq!(app.focus_index, 0);
    }

    #[test]
    fn enter_on_generate_validates() {
        let mut app = app();
        app.focus_index = FOCUS_SLOTS - 1;
        handle_dashboard_input(&mut app, KeyCode::Enter);
        assert!(!app.validation_errors.is_empty());
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        handle_dashboard_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
