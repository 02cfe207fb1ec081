//! Bounded automation of a live page: tabs, "load more", infinite scroll
//! and pagination, in that order.
//!
//! Every action returns `Result<Outcome, SkipReason>`; the phase loops
//! decide from those whether to continue, move to the next target, or stop.
//! Nothing here fails the surrounding fetch.

pub mod steps;

use crate::config::Timings;
use crate::context::RequestContext;
use crate::fetchers::session::{PageSession, SessionError, Target, wait_until_ready};
use crate::parsers::text::truncate_chars;
use crate::results::{Click, ClickKind, InteractionLog, PageVisit};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use steps::{
    ClickPhase, ClickStrategy, LOAD_MORE, MAX_CLICK_TEXT_CHARS, MAX_SCROLLS, NEXT_PAGE, Outcome,
    SkipReason, TABS,
};

/// Runs one session primitive under a deadline, turning every failure into a skip
async fn bounded<T>(
    limit: Duration,
    action: impl Future<Output = Result<T, SessionError>>,
) -> Result<T, SkipReason> {
    match tokio::time::timeout(limit, action).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(SessionError::Missing { .. })) => Err(SkipReason::NoMatch),
        Ok(Err(e)) => Err(SkipReason::Failed(e.to_string())),
        Err(_) => Err(SkipReason::Timeout),
    }
}

pub struct InteractionEngine<'a> {
    session: &'a mut dyn PageSession,
    timings: &'a Timings,
    ctx: &'a RequestContext,
    log: InteractionLog,
}

impl<'a> InteractionEngine<'a> {
    pub fn new(
        session: &'a mut dyn PageSession,
        timings: &'a Timings,
        ctx: &'a RequestContext,
    ) -> Self {
        Self {
            session,
            timings,
            ctx,
            log: InteractionLog::default(),
        }
    }

    /// Runs all four phases; `max_depth` counts the opening page
    pub async fn run(mut self, max_depth: usize) -> InteractionLog {
        self.click_phase(&TABS).await;
        self.click_phase(&LOAD_MORE).await;
        self.scroll_phase().await;
        self.pagination_phase(max_depth).await;

        ::log::info!(
            "[{}] Interactions completed: {} clicks, {} scrolls, {} extra pages",
            self.ctx,
            self.log.clicks.len(),
            self.log.scrolls,
            self.log.pages.len()
        );
        self.log
    }

    async fn click_phase(&mut self, phase: &ClickPhase) {
        match phase.strategy {
            ClickStrategy::EachMatch { limit } => self.click_each(phase, limit).await,
            ClickStrategy::RepeatFirst { limit } => self.click_repeat(phase, limit).await,
        }
    }

    async fn click_each(&mut self, phase: &ClickPhase, limit: usize) {
        for target in phase.candidates {
            let matches = match bounded(self.timings.visibility(), self.session.count(target)).await
            {
                Ok(n) => n,
                Err(reason) => {
                    ::log::debug!("[{}] No {:?} matches for {}: {}", self.ctx, phase.kind, target, reason);
                    continue;
                }
            };
            if matches == 0 {
                continue;
            }

            for index in 0..matches.min(limit) {
                match self.click_step(phase.kind, target, index).await {
                    Ok(outcome) => ::log::info!("[{}] {} #{}: {}", self.ctx, target, index, outcome),
                    Err(reason) => {
                        ::log::debug!("[{}] Skipped {} #{}: {}", self.ctx, target, index, reason)
                    }
                }
            }
            // Later targets are only fallbacks for pages where this one matched nothing
            break;
        }
    }

    async fn click_repeat(&mut self, phase: &ClickPhase, limit: usize) {
        let mut clicks = 0;
        for target in phase.candidates {
            while clicks < limit {
                match self.click_step(phase.kind, target, 0).await {
                    Ok(outcome) => {
                        clicks += 1;
                        ::log::info!("[{}] {} ({}/{}): {}", self.ctx, target, clicks, limit, outcome);
                    }
                    Err(reason) => {
                        ::log::debug!("[{}] Stopped clicking {}: {}", self.ctx, target, reason);
                        break;
                    }
                }
            }
            if clicks > 0 {
                break;
            }
        }
    }

    /// Clicks one element and records it in the log
    async fn click_step(
        &mut self,
        kind: ClickKind,
        target: &Target,
        index: usize,
    ) -> Result<Outcome, SkipReason> {
        self.ensure_visible(target, index).await?;
        let text = bounded(self.timings.click(), self.session.text(target, index)).await?;
        self.press(target, index).await?;
        tokio::time::sleep(self.settle_after(kind)).await;

        let text = truncate_chars(text.trim(), MAX_CLICK_TEXT_CHARS);
        self.log.clicks.push(Click {
            kind,
            selector: target.to_string(),
            text: text.clone(),
        });
        Ok(Outcome::Clicked { text })
    }

    async fn ensure_visible(&mut self, target: &Target, index: usize) -> Result<(), SkipReason> {
        if bounded(self.timings.visibility(), self.session.is_visible(target, index)).await? {
            Ok(())
        } else {
            Err(SkipReason::NotVisible)
        }
    }

    async fn press(&mut self, target: &Target, index: usize) -> Result<(), SkipReason> {
        bounded(self.timings.click(), self.session.click(target, index)).await
    }

    fn settle_after(&self, kind: ClickKind) -> Duration {
        match kind {
            ClickKind::Tab => self.timings.tab_settle(),
            ClickKind::LoadMore => self.timings.load_more_settle(),
        }
    }

    async fn scroll_phase(&mut self) {
        let mut height = match bounded(self.timings.click(), self.session.scroll_height()).await {
            Ok(height) => height,
            Err(reason) => {
                ::log::debug!("[{}] Skipping scroll: {}", self.ctx, reason);
                return;
            }
        };

        for attempt in 1..=MAX_SCROLLS {
            match self.scroll_step(&mut height).await {
                Ok(outcome) => {
                    ::log::info!("[{}] Scrolled {}/{}: {}", self.ctx, attempt, MAX_SCROLLS, outcome)
                }
                Err(reason) => {
                    ::log::debug!("[{}] Scrolling stopped: {}", self.ctx, reason);
                    break;
                }
            }
        }
    }

    /// Scrolls to the bottom once; succeeds only if the document grew past `height`
    async fn scroll_step(&mut self, height: &mut u64) -> Result<Outcome, SkipReason> {
        bounded(self.timings.click(), self.session.scroll_to_bottom()).await?;
        tokio::time::sleep(self.timings.scroll_settle()).await;

        let grown = bounded(self.timings.click(), self.session.scroll_height()).await?;
        if grown <= *height {
            return Err(SkipReason::Unchanged);
        }

        *height = grown;
        self.log.scrolls += 1;
        Ok(Outcome::Grew { height: grown })
    }

    async fn pagination_phase(&mut self, max_depth: usize) {
        let start = match bounded(self.timings.click(), self.session.current_url()).await {
            Ok(url) => url,
            Err(reason) => {
                ::log::debug!("[{}] Skipping pagination: {}", self.ctx, reason);
                return;
            }
        };

        let mut visited = HashSet::from([start]);
        let mut page_number: u32 = 1;

        while (page_number as usize) < max_depth {
            let mut advanced = false;

            for target in NEXT_PAGE {
                match self.page_step(target, &mut visited, page_number + 1).await {
                    Ok(outcome) => {
                        page_number += 1;
                        advanced = true;
                        ::log::info!("[{}] Page {} via {}: {}", self.ctx, page_number, target, outcome);
                        break;
                    }
                    Err(SkipReason::Revisited(url)) => {
                        ::log::info!("[{}] Pagination stopped, {} already visited", self.ctx, url);
                        return;
                    }
                    Err(reason) => {
                        ::log::trace!("[{}] No next page via {}: {}", self.ctx, target, reason)
                    }
                }
            }

            if !advanced {
                break;
            }
        }
    }

    /// Follows one "next" control and records the page if it is new
    async fn page_step(
        &mut self,
        target: &Target,
        visited: &mut HashSet<String>,
        page_number: u32,
    ) -> Result<Outcome, SkipReason> {
        self.ensure_visible(target, 0).await?;
        self.press(target, 0).await?;

        if !wait_until_ready(
            &mut *self.session,
            self.timings.pagination_idle(),
            self.timings.poll_interval(),
        )
        .await
        {
            ::log::debug!("[{}] Next page still loading, reading it anyway", self.ctx);
        }

        let url = bounded(self.timings.click(), self.session.current_url()).await?;
        if !visited.insert(url.clone()) {
            return Err(SkipReason::Revisited(url));
        }

        self.log.pages.push(PageVisit {
            page_number,
            url: url.clone(),
        });
        Ok(Outcome::Arrived { url })
    }
}
