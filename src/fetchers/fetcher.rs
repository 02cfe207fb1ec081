use crate::context::RequestContext;
use crate::error::ScrapeError;
use crate::parsers::{ParsedPage, Parser};
use crate::results::PageContent;
use async_trait::async_trait;
use std::sync::Arc;

/// One way of turning a URL into page content
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches and reduces `url`; the result is not yet timestamped
    async fn fetch(&self, url: &str, ctx: &RequestContext) -> Result<PageContent, ScrapeError>;
}

/// Runs the parser on the blocking pool so large documents don't stall the runtime
pub async fn parse_off_thread(
    parser: Arc<Parser>,
    html: String,
    base_url: String,
) -> Result<ParsedPage, ScrapeError> {
    tokio::task::spawn_blocking(move || parser.parse(&html, &base_url))
        .await
        .map_err(|e| ScrapeError::Internal(format!("parser task failed: {e}")))
}
