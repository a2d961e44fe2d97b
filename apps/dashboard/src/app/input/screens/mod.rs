use crate::app::state::App;
use crossterm::event::KeyCode;

mod dashboard;
mod help;
mod picker;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.picker.is_some() {
        picker::handle_picker_input(app, key);
        return;
    }

    dashboard::handle_dashboard_input(app, key);
}
