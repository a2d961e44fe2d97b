use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_picker_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.close_picker(),
        KeyCode::Enter => app.confirm_picker(),
        KeyCode::Up => {
            if let Some(picker) = app.picker.as_mut() {
                picker.select_previous();
            }
        }
        KeyCode::Down | KeyCode::Tab => {
            if let Some(picker) = app.picker.as_mut() {
                picker.select_next();
            }
        }
        KeyCode::Backspace => {
            if let Some(picker) = app.picker.as_mut() {
                picker.pop();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(picker) = app.picker.as_mut() {
                picker.push(ch);
            }
        }
        _ => {}
    }
}
