use std::fmt;
use thiserror::Error;

/// Which breakdown came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResultsReason {
    /// Both breakdowns are empty.
    TradeFlowAndReporter,
    /// Only the partner-country breakdown is empty.
    ReporterAndPartner,
    /// Only the product-group breakdown is empty.
    ReporterAndProductGroup,
}

impl NoResultsReason {
    pub const fn message(self) -> &'static str {
        match self {
            Self::TradeFlowAndReporter => {
                "No results found for this Trade Flow and Reporter Country combination."
            }
            Self::ReporterAndPartner => {
                "No results found for this Reporter and Partner Country combination."
            }
            Self::ReporterAndProductGroup => {
                "No results found for this Reporter Country and Product Group combination."
            }
        }
    }
}

impl fmt::Display for NoResultsReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a results fetch that did not produce data.
///
/// `EmptyQuery` and `AlreadyFetching` are guard outcomes, not failures; they
/// never reach the store as `FetchFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No query has been entered")]
    EmptyQuery,

    #[error("A results fetch is already in progress")]
    AlreadyFetching,

    #[error("There was an error retrieving results from the data source: {0}")]
    Transport(String),

    #[error("{0}")]
    NoResults(NoResultsReason),
}

impl FetchError {
    /// Domain-empty results need different filters; transport failures may
    /// succeed on a plain retry.
    pub const fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults(_))
    }
}

/// Errors from talking to the statistics API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<SourceError> for FetchError {
    fn from(error: SourceError) -> Self {
        Self::Transport(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("STEEL_API_KEY is not set; pass --api-key or add it to .env")]
    MissingApiKey,

    #[error("Invalid API host {host}: {reason}")]
    InvalidHost { host: String, reason: String },
}
