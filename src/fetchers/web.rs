//! Rendered fetch path: a real browser session, driven by the interaction engine.

use crate::config::{ScraperConfig, Timings};
use crate::context::RequestContext;
use crate::error::ScrapeError;
use crate::fetchers::fetcher::{Fetch, parse_off_thread};
use crate::fetchers::session::{Launch, PageSession, Target, wait_until_ready};
use crate::interactions::InteractionEngine;
use crate::parsers::Parser;
use crate::results::PageContent;
use crate::urls;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::timeout;

/// Selectors whose presence means the page has rendered its main content
const CONTENT_SELECTORS: &[Target] = &[
    Target::Css("main"),
    Target::Css("article"),
    Target::Css(r#"[role="main"]"#),
    Target::Css("body"),
];

pub struct RenderedFetcher {
    launcher: Arc<dyn Launch>,
    parser: Arc<Parser>,
    timings: Timings,
    max_depth: usize,
}

impl RenderedFetcher {
    pub fn new(launcher: Arc<dyn Launch>, parser: Arc<Parser>, config: &ScraperConfig) -> Self {
        Self {
            launcher,
            parser,
            timings: config.timings,
            max_depth: config.max_depth,
        }
    }

    /// Everything between launch and close
    async fn drive(
        &self,
        session: &mut dyn PageSession,
        url: &str,
        ctx: &RequestContext,
    ) -> Result<PageContent, ScrapeError> {
        match timeout(self.timings.navigation(), session.goto(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(ScrapeError::Render(format!("navigation to {url} failed: {e}"))),
            Err(_) => {
                return Err(ScrapeError::Render(format!(
                    "navigation to {url} timed out after {}ms",
                    self.timings.navigation_ms
                )));
            }
        }

        if wait_until_ready(session, self.timings.network_idle(), self.timings.poll_interval()).await {
            ::log::debug!("[{}] Network idle reached", ctx);
        } else {
            ::log::warn!("[{}] Network idle timeout, proceeding anyway", ctx);
        }

        for selector in CONTENT_SELECTORS {
            let wait = session.wait_for(selector, self.timings.content_selector());
            if let Ok(Ok(())) = timeout(self.timings.content_selector(), wait).await {
                ::log::debug!("[{}] Found content with selector: {}", ctx, selector);
                break;
            }
        }

        tokio::time::sleep(self.timings.settle()).await;

        let script = self.parser.noise().removal_script();
        match timeout(self.timings.command(), session.execute(&script)).await {
            Ok(Ok(removed)) => {
                ::log::debug!("[{}] Removed {} noise elements from live page", ctx, removed)
            }
            Ok(Err(e)) => ::log::debug!("[{}] Could not remove noise elements: {}", ctx, e),
            Err(_) => ::log::warn!("[{}] Noise removal timed out, proceeding anyway", ctx),
        }

        let interactions = InteractionEngine::new(&mut *session, &self.timings, ctx)
            .run(self.max_depth)
            .await;

        // The session may have paginated away from `url`
        let final_url = match timeout(self.timings.command(), session.current_url()).await {
            Ok(Ok(current)) => current,
            Ok(Err(e)) => {
                ::log::debug!("[{}] Could not read current URL: {}", ctx, e);
                url.to_string()
            }
            Err(_) => {
                ::log::warn!("[{}] Reading current URL timed out, using {}", ctx, url);
                url.to_string()
            }
        };

        let html = match timeout(self.timings.command(), session.content()).await {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => {
                return Err(ScrapeError::Render(format!("could not read rendered page: {e}")));
            }
            Err(_) => {
                return Err(ScrapeError::Render(format!(
                    "reading rendered page timed out after {}ms",
                    self.timings.command_ms
                )));
            }
        };

        let page = parse_off_thread(Arc::clone(&self.parser), html, final_url).await?;

        Ok(PageContent {
            url: url.to_string(),
            meta: page.meta,
            sections: page.sections,
            interactions,
        })
    }
}

#[async_trait]
impl Fetch for RenderedFetcher {
    async fn fetch(&self, url: &str, ctx: &RequestContext) -> Result<PageContent, ScrapeError> {
        let normalized = urls::normalize(url)?;
        ::log::info!("[{}] Rendering page with browser: {}", ctx, normalized);

        let mut session = self
            .launcher
            .launch()
            .await
            .map_err(|e| ScrapeError::Render(e.to_string()))?;

        let result = self.drive(session.as_mut(), &normalized, ctx).await;

        match timeout(self.timings.command(), session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => ::log::warn!("[{}] Failed to close browser session: {}", ctx, e),
            Err(_) => ::log::warn!("[{}] Closing browser session timed out", ctx),
        }

        match &result {
            Ok(page) => ::log::info!(
                "[{}] Rendered scraping completed: {} sections found",
                ctx,
                page.sections.len()
            ),
            Err(e) => ::log::error!("[{}] Rendered fetch failed: {}", ctx, e),
        }
        result
    }
}
