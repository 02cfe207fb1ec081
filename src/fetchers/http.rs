//! Static fetch path: one GET, no JavaScript.

use crate::config::ScraperConfig;
use crate::context::RequestContext;
use crate::error::ScrapeError;
use crate::fetchers::fetcher::{Fetch, parse_off_thread};
use crate::parsers::Parser;
use crate::results::{InteractionLog, PageContent};
use crate::urls;
use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use std::sync::Arc;

/// Fetches pages with a plain HTTP GET.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    client: Client,
    parser: Arc<Parser>,
}

impl StaticFetcher {
    pub fn new(config: &ScraperConfig, parser: Arc<Parser>) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(Policy::limited(config.max_redirects))
            .timeout(config.http_timeout())
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ScrapeError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, parser })
    }

    /// GETs `url` and returns the body, classifying failures as network errors
    async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Network(format!("Network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Network(format!(
                "HTTP {}: {} for url {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unexpected status"),
                response.url()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::Parsing(format!("could not decode response body: {e}")))
    }
}

#[async_trait]
impl Fetch for StaticFetcher {
    async fn fetch(&self, url: &str, ctx: &RequestContext) -> Result<PageContent, ScrapeError> {
        let normalized = urls::normalize(url)?;
        ::log::info!("[{}] Fetching static content from: {}", ctx, normalized);

        let html = match self.get(&normalized).await {
            Ok(html) => html,
            Err(e) => {
                ::log::error!("[{}] Static fetch failed: {}", ctx, e);
                return Err(e);
            }
        };

        let page = parse_off_thread(Arc::clone(&self.parser), html, normalized.clone()).await?;

        ::log::info!(
            "[{}] Static scraping completed: {} sections found",
            ctx,
            page.sections.len()
        );

        Ok(PageContent {
            url: normalized,
            meta: page.meta,
            sections: page.sections,
            interactions: InteractionLog::default(),
        })
    }
}
