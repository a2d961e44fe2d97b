// Application state, input handling and background requests

pub mod actions;
pub mod input;
pub mod picker;
pub mod state;

pub use actions::TaskEvent;
pub use input::handle_input;
pub use state::App;
