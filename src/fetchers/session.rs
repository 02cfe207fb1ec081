//! Rendered-session capability set and its WebDriver implementation.
//!
//! The interaction engine and the rendered fetcher only talk to
//! [`PageSession`]; [`WebDriverLauncher`] provides sessions backed by a
//! fantoccini client.

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const SCROLL_HEIGHT_SCRIPT: &str = "return document.body ? document.body.scrollHeight : 0;";
const SCROLL_TO_BOTTOM_SCRIPT: &str =
    "window.scrollTo(0, document.body ? document.body.scrollHeight : 0);";
const READY_STATE_SCRIPT: &str = "return document.readyState === 'complete';";

/// Failure of a single session primitive
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not start a browser session: {0}")]
    Launch(String),

    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("no element #{index} for {target}")]
    Missing { target: String, index: usize },

    #[error("{0}")]
    Other(String),
}

/// Something on the page an action can be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Plain CSS selector
    Css(&'static str),
    /// Elements with tag `tag` whose visible text contains `text`, case-insensitively
    Text {
        tag: &'static str,
        text: &'static str,
    },
}

/// A target translated into a WebDriver query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Css(&'static str),
    XPath(String),
}

impl Query {
    fn locator(&self) -> Locator<'_> {
        match self {
            Query::Css(css) => Locator::Css(css),
            Query::XPath(xpath) => Locator::XPath(xpath),
        }
    }
}

impl Target {
    pub fn query(&self) -> Query {
        match *self {
            Target::Css(css) => Query::Css(css),
            Target::Text { tag, text } => Query::XPath(format!(
                "//{tag}[contains(translate(normalize-space(.), \
                 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), '{}')]",
                text.to_lowercase()
            )),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Css(css) => f.write_str(css),
            Target::Text { tag, text } => write!(f, "{tag}:contains(\"{text}\")"),
        }
    }
}

/// A live, JavaScript-executing page owned by one request
#[async_trait]
pub trait PageSession: Send {
    /// Navigate and wait for the document to load
    async fn goto(&mut self, url: &str) -> Result<(), SessionError>;

    /// Run a script (a function body) in the page
    async fn execute(&mut self, script: &str) -> Result<Value, SessionError>;

    /// Wait until at least one element matches, failing after `timeout`
    async fn wait_for(&mut self, target: &Target, timeout: Duration) -> Result<(), SessionError>;

    /// Number of elements currently matching
    async fn count(&mut self, target: &Target) -> Result<usize, SessionError>;

    async fn is_visible(&mut self, target: &Target, index: usize) -> Result<bool, SessionError>;

    async fn text(&mut self, target: &Target, index: usize) -> Result<String, SessionError>;

    async fn click(&mut self, target: &Target, index: usize) -> Result<(), SessionError>;

    async fn current_url(&mut self) -> Result<String, SessionError>;

    /// Serialized DOM as it is now
    async fn content(&mut self) -> Result<String, SessionError>;

    /// Ends the session; called exactly once on every exit path
    async fn close(self: Box<Self>) -> Result<(), SessionError>;

    async fn is_ready(&mut self) -> Result<bool, SessionError> {
        Ok(self.execute(READY_STATE_SCRIPT).await?.as_bool().unwrap_or(false))
    }

    async fn scroll_height(&mut self) -> Result<u64, SessionError> {
        let value = self.execute(SCROLL_HEIGHT_SCRIPT).await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.max(0.0) as u64))
            .ok_or_else(|| SessionError::Other(format!("unexpected scroll height {value}")))
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError> {
        self.execute(SCROLL_TO_BOTTOM_SCRIPT).await.map(|_| ())
    }
}

/// Starts rendered sessions
#[async_trait]
pub trait Launch: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn PageSession>, SessionError>;
}

/// Polls the document ready state until complete or `timeout` elapses.
///
/// Returns whether the page reported ready; a timeout is not an error.
pub async fn wait_until_ready(
    session: &mut dyn PageSession,
    timeout: Duration,
    poll: Duration,
) -> bool {
    let waited = tokio::time::timeout(timeout, async {
        loop {
            if let Ok(true) = session.is_ready().await {
                return;
            }
            tokio::time::sleep(poll).await;
        }
    })
    .await;

    waited.is_ok()
}

/// Launches sessions on a WebDriver server (e.g. ChromeDriver)
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    fallback_urls: Vec<String>,
    user_agent: String,
    headless: bool,
    window: (u32, u32),
    page_load_timeout: Duration,
}

impl WebDriverLauncher {
    pub fn new(config: &crate::config::ScraperConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            fallback_urls: config.fallback_webdriver_urls.clone(),
            user_agent: config.user_agent.clone(),
            headless: config.headless,
            window: (config.window_width, config.window_height),
            page_load_timeout: config.timings.navigation(),
        }
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut args = vec![
            format!("--user-agent={}", self.user_agent),
            format!("--window-size={},{}", self.window.0, self.window.1),
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }

        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps.insert(
            "timeouts".to_string(),
            json!({ "pageLoad": self.page_load_timeout.as_millis() as u64 }),
        );
        caps
    }

    async fn connect(&self, url: &str) -> Result<Client, String> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        match tokio::time::timeout(self.page_load_timeout, builder.connect(url)).await {
            Ok(connected) => connected.map_err(|e| e.to_string()),
            Err(_) => Err(format!(
                "timed out connecting after {}ms",
                self.page_load_timeout.as_millis()
            )),
        }
    }
}

#[async_trait]
impl Launch for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn PageSession>, SessionError> {
        let primary_error = match self.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(Box::new(WebDriverSession::new(client, self.window).await));
            }
            Err(e) => e,
        };

        ::log::warn!(
            "Failed to connect to WebDriver at {}: {}",
            self.webdriver_url,
            primary_error
        );

        for url in &self.fallback_urls {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = self.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Box::new(WebDriverSession::new(client, self.window).await));
            }
        }

        Err(SessionError::Launch(format!(
            "no WebDriver server reachable at {} ({})",
            self.webdriver_url, primary_error
        )))
    }
}

/// A [`PageSession`] backed by a fantoccini client
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    async fn new(client: Client, window: (u32, u32)) -> Self {
        if let Err(e) = client.set_window_size(window.0, window.1).await {
            ::log::debug!("Could not resize browser window: {}", e);
        }
        Self { client }
    }

    async fn find_all(&self, target: &Target) -> Result<Vec<Element>, SessionError> {
        let query = target.query();
        Ok(self.client.find_all(query.locator()).await?)
    }

    async fn nth(&self, target: &Target, index: usize) -> Result<Element, SessionError> {
        self.find_all(target)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| SessionError::Missing {
                target: target.to_string(),
                index,
            })
    }
}

#[async_trait]
impl PageSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        Ok(self.client.goto(url).await?)
    }

    async fn execute(&mut self, script: &str) -> Result<Value, SessionError> {
        Ok(self.client.execute(script, Vec::new()).await?)
    }

    async fn wait_for(&mut self, target: &Target, timeout: Duration) -> Result<(), SessionError> {
        let query = target.query();
        self.client
            .wait()
            .at_most(timeout)
            .for_element(query.locator())
            .await?;
        Ok(())
    }

    async fn count(&mut self, target: &Target) -> Result<usize, SessionError> {
        Ok(self.find_all(target).await?.len())
    }

    async fn is_visible(&mut self, target: &Target, index: usize) -> Result<bool, SessionError> {
        Ok(self.nth(target, index).await?.is_displayed().await?)
    }

    async fn text(&mut self, target: &Target, index: usize) -> Result<String, SessionError> {
        Ok(self.nth(target, index).await?.text().await?)
    }

    async fn click(&mut self, target: &Target, index: usize) -> Result<(), SessionError> {
        self.nth(target, index).await?.click().await?;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn content(&mut self) -> Result<String, SessionError> {
        Ok(self.client.source().await?)
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        let WebDriverSession { client } = *self;
        Ok(client.close().await?)
    }
}
