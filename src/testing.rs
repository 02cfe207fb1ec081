//! Scripted stand-ins for a browser session, used by engine and fetcher tests.

use crate::config::Timings;
use crate::fetchers::session::{Launch, PageSession, SessionError, Target};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Timings with no settle delays and short bounded waits
pub(crate) fn fast_timings() -> Timings {
    Timings {
        navigation_ms: 200,
        network_idle_ms: 50,
        content_selector_ms: 50,
        settle_ms: 0,
        tab_settle_ms: 0,
        load_more_settle_ms: 0,
        scroll_settle_ms: 0,
        pagination_idle_ms: 50,
        visibility_ms: 50,
        click_ms: 50,
        command_ms: 50,
        poll_interval_ms: 5,
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeElement {
    pub text: String,
    pub visible: bool,
    /// Becomes invisible once clicked this many times
    pub hides_after: Option<usize>,
    /// Page URL after each successive click
    pub navigates_to: VecDeque<String>,
    /// Replaces the page markup when clicked
    pub reveals: Option<String>,
    pub clicks: usize,
}

impl FakeElement {
    pub fn visible(text: &str) -> Self {
        Self {
            text: text.to_string(),
            visible: true,
            ..Self::default()
        }
    }

    pub fn hidden(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn hides_after(mut self, clicks: usize) -> Self {
        self.hides_after = Some(clicks);
        self
    }

    pub fn navigates_to(mut self, urls: &[&str]) -> Self {
        self.navigates_to = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn reveals(mut self, html: &str) -> Self {
        self.reveals = Some(html.to_string());
        self
    }
}

/// A page whose elements and behavior are scripted up front
#[derive(Debug, Default)]
pub(crate) struct FakePage {
    /// Keyed by the target's display form
    pub elements: HashMap<String, Vec<FakeElement>>,
    /// Document height reported after 0, 1, 2, ... scrolls
    pub heights: Vec<u64>,
    pub scrolled: usize,
    pub url: String,
    pub html: String,
    pub scripts: Arc<Mutex<Vec<String>>>,
    pub fail_goto: bool,
    /// The DOM read never completes
    pub stall_content: bool,
    /// Element action that never completes, keyed like `elements`
    pub stalls: Option<String>,
    pub closed: Arc<AtomicBool>,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            heights: vec![1000],
            ..Self::default()
        }
    }

    pub fn with(mut self, target: Target, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(target.to_string(), elements);
        self
    }

    pub fn element(&self, target: Target, index: usize) -> &FakeElement {
        &self.elements[&target.to_string()][index]
    }

    fn find(&mut self, target: &Target, index: usize) -> Result<&mut FakeElement, SessionError> {
        self.elements
            .get_mut(&target.to_string())
            .and_then(|els| els.get_mut(index))
            .ok_or_else(|| SessionError::Missing {
                target: target.to_string(),
                index,
            })
    }

    async fn maybe_stall(&self, target: &Target) {
        if self.stalls.as_deref() == Some(target.to_string().as_str()) {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl PageSession for FakePage {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        if self.fail_goto {
            return Err(SessionError::Other(format!("net::ERR_NAME_NOT_RESOLVED at {url}")));
        }
        self.url = url.to_string();
        Ok(())
    }

    async fn execute(&mut self, script: &str) -> Result<Value, SessionError> {
        self.scripts
            .lock()
            .map_err(|e| SessionError::Other(e.to_string()))?
            .push(script.to_string());
        Ok(Value::from(0))
    }

    async fn wait_for(&mut self, target: &Target, timeout: Duration) -> Result<(), SessionError> {
        if self.elements.get(&target.to_string()).is_some_and(|els| !els.is_empty()) {
            Ok(())
        } else {
            tokio::time::sleep(timeout).await;
            Err(SessionError::Other(format!("timed out waiting for {target}")))
        }
    }

    async fn count(&mut self, target: &Target) -> Result<usize, SessionError> {
        Ok(self.elements.get(&target.to_string()).map_or(0, Vec::len))
    }

    async fn is_visible(&mut self, target: &Target, index: usize) -> Result<bool, SessionError> {
        Ok(self.find(target, index)?.visible)
    }

    async fn text(&mut self, target: &Target, index: usize) -> Result<String, SessionError> {
        Ok(self.find(target, index)?.text.clone())
    }

    async fn click(&mut self, target: &Target, index: usize) -> Result<(), SessionError> {
        self.maybe_stall(target).await;

        let element = self.find(target, index)?;
        element.clicks += 1;
        if element.hides_after.is_some_and(|n| element.clicks >= n) {
            element.visible = false;
        }
        let next_url = element.navigates_to.pop_front();
        let revealed = element.reveals.clone();

        if let Some(url) = next_url {
            self.url = url;
        }
        if let Some(html) = revealed {
            self.html = html;
        }
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self.url.clone())
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        if self.stall_content {
            std::future::pending::<()>().await;
        }
        Ok(self.html.clone())
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_ready(&mut self) -> Result<bool, SessionError> {
        Ok(true)
    }

    async fn scroll_height(&mut self) -> Result<u64, SessionError> {
        let last = self.heights.len().saturating_sub(1);
        Ok(self.heights.get(self.scrolled.min(last)).copied().unwrap_or(0))
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError> {
        self.scrolled += 1;
        Ok(())
    }
}

/// Hands out one scripted page, then refuses
#[derive(Debug, Default)]
pub(crate) struct FakeLauncher {
    page: Mutex<Option<FakePage>>,
    pub launches: Arc<std::sync::atomic::AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(page: FakePage) -> Self {
        Self {
            page: Mutex::new(Some(page)),
            launches: Arc::default(),
        }
    }

    /// A launcher with no browser behind it
    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Launch for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn PageSession>, SessionError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let page = self.page.lock().map_err(|e| SessionError::Other(e.to_string()))?.take();
        match page {
            Some(page) => Ok(Box::new(page)),
            None => Err(SessionError::Launch("no browser available".into())),
        }
    }
}
