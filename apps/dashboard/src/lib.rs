// Export our modules for use in binaries and tests
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod options;
pub mod query;
pub mod results;
pub mod source;
pub mod store;
pub mod time_periods;

pub use domain::{FlowType, SelectOption, TradeFlow};
pub use error::{FetchError, NoResultsReason, SourceError};
