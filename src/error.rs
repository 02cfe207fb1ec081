use thiserror::Error;

/// Failures surfaced by a scrape.
///
/// `Network`, `Parsing` and `Render` are degradable: the dispatcher turns them
/// into a well-formed result carrying the message in `errors`. `InvalidUrl` and
/// `Internal` reach the caller.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Malformed URL or disallowed scheme, rejected before any fetch
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Static fetch transport failure or non-2xx status
    #[error("{0}")]
    Network(String),

    /// Static HTML could not be reduced to a document
    #[error("Failed to parse HTML: {0}")]
    Parsing(String),

    /// Rendered session failed to launch, navigate or finish
    #[error("Failed to render page: {0}")]
    Render(String),

    /// Anything unclassified
    #[error("Unexpected failure: {0}")]
    Internal(String),
}

impl ScrapeError {
    /// Whether this failure is reported through a degraded result instead of an error
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Network(_) | ScrapeError::Parsing(_) | ScrapeError::Render(_)
        )
    }
}
