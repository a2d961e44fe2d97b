pub mod picker;
pub mod popup;
pub mod results;
pub mod tables;
