//! Static-first dispatch: render only when the static result is too thin.

use crate::config::SufficiencyPolicy;
use crate::context::RequestContext;
use crate::error::ScrapeError;
use crate::fetchers::Fetch;
use crate::results::{ContentModel, PageContent};
use crate::urls;
use chrono::Utc;
use std::fmt;

/// Verdict on a static result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sufficiency {
    Sufficient,
    TooFewSections(usize),
    TooLittleText(usize),
    /// No section has text, a link or an image
    NoContent,
}

impl Sufficiency {
    pub fn is_sufficient(&self) -> bool {
        *self == Sufficiency::Sufficient
    }
}

impl fmt::Display for Sufficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sufficiency::Sufficient => f.write_str("sufficient"),
            Sufficiency::TooFewSections(n) => write!(f, "insufficient sections found ({n})"),
            Sufficiency::TooLittleText(n) => write!(f, "insufficient text content: {n} chars"),
            Sufficiency::NoContent => f.write_str("no meaningful content"),
        }
    }
}

/// Checks, in order, section count, total text length, and presence of any content
pub fn check_sufficiency(page: &PageContent, policy: &SufficiencyPolicy) -> Sufficiency {
    if page.sections.len() < policy.min_sections {
        return Sufficiency::TooFewSections(page.sections.len());
    }

    let total = page.total_text_len();
    if total < policy.min_text_length {
        return Sufficiency::TooLittleText(total);
    }

    let has_content = page
        .sections
        .iter()
        .any(|s| !s.text.is_empty() || !s.links.is_empty() || !s.images.is_empty());
    if !has_content {
        return Sufficiency::NoContent;
    }

    Sufficiency::Sufficient
}

/// Runs the static fetcher, falls back to the rendered one on a thin result,
/// and stamps every outcome exactly once
pub struct Dispatcher {
    static_fetcher: Box<dyn Fetch>,
    rendered_fetcher: Box<dyn Fetch>,
    sufficiency: SufficiencyPolicy,
}

impl Dispatcher {
    pub fn new(
        static_fetcher: Box<dyn Fetch>,
        rendered_fetcher: Box<dyn Fetch>,
        sufficiency: SufficiencyPolicy,
    ) -> Self {
        Self {
            static_fetcher,
            rendered_fetcher,
            sufficiency,
        }
    }

    /// Scrapes `url` into a content model.
    ///
    /// Network, parsing and render failures come back as `Ok` with a degraded
    /// model; only an invalid URL or an unclassified failure is an `Err`.
    pub async fn scrape(&self, url: &str) -> Result<ContentModel, ScrapeError> {
        let ctx = RequestContext::new(url);
        ::log::info!("[{}] Scraping URL: {}", ctx, url);

        urls::normalize(url)?;

        let model = match self.fetch(url, &ctx).await {
            Ok(page) => ContentModel::stamped(page, Utc::now()),
            Err(e) if e.is_degradable() => {
                ::log::error!("[{}] Scraper error: {}", ctx, e);
                ContentModel::degraded(ctx.requested_url(), e.to_string(), Utc::now())
            }
            Err(e) => {
                ::log::error!("[{}] Unexpected error: {}", ctx, e);
                return Err(e);
            }
        };

        ::log::info!(
            "[{}] Finished in {:.2}s with {} sections",
            ctx,
            ctx.elapsed().as_secs_f64(),
            model.sections.len()
        );
        Ok(model)
    }

    async fn fetch(&self, url: &str, ctx: &RequestContext) -> Result<PageContent, ScrapeError> {
        let page = self.static_fetcher.fetch(url, ctx).await?;

        let verdict = check_sufficiency(&page, &self.sufficiency);
        if verdict.is_sufficient() {
            ::log::info!("[{}] Static scraping successful", ctx);
            return Ok(page);
        }

        ::log::info!(
            "[{}] Static scraping insufficient ({}), using rendered fetch",
            ctx,
            verdict
        );
        self.rendered_fetcher.fetch(url, ctx).await
    }
}
