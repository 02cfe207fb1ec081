use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or applying configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid noise selector `{0}`")]
    Selector(String),

    #[error("invalid noise style pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Configuration for the scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// WebDriver endpoints tried when the primary one refuses a session
    #[serde(default = "default_fallback_webdriver_urls")]
    pub fallback_webdriver_urls: Vec<String>,

    /// User agent for both the HTTP client and the browser
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Overall timeout of the static GET
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Pages visited in a pagination series, including the first one
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub sufficiency: SufficiencyPolicy,

    #[serde(default)]
    pub noise: NoiseConfig,

    #[serde(default)]
    pub timings: Timings,
}

/// Thresholds deciding whether a static result can skip rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SufficiencyPolicy {
    #[serde(default = "default_min_sections")]
    pub min_sections: usize,

    /// Minimum summed section text, in characters
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,
}

/// Which elements count as overlay noise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Candidate selectors for banners, consent dialogs and modals
    #[serde(default = "default_noise_selectors")]
    pub selectors: Vec<String>,

    /// A candidate is removed only if its inline style matches this pattern
    /// (or it is a dialog)
    #[serde(default = "default_noise_style_pattern")]
    pub style_pattern: String,
}

/// Bounded waits used by the fetchers and the interaction engine, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub navigation_ms: u64,
    pub network_idle_ms: u64,
    pub content_selector_ms: u64,
    pub settle_ms: u64,
    pub tab_settle_ms: u64,
    pub load_more_settle_ms: u64,
    pub scroll_settle_ms: u64,
    pub pagination_idle_ms: u64,
    pub visibility_ms: u64,
    pub click_ms: u64,
    /// Any other single browser command (script, DOM read, close)
    pub command_ms: u64,
    pub poll_interval_ms: u64,
}

impl Timings {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn content_selector(&self) -> Duration {
        Duration::from_millis(self.content_selector_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }

    pub fn load_more_settle(&self) -> Duration {
        Duration::from_millis(self.load_more_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn pagination_idle(&self) -> Duration {
        Duration::from_millis(self.pagination_idle_ms)
    }

    pub fn visibility(&self) -> Duration {
        Duration::from_millis(self.visibility_ms)
    }

    pub fn click(&self) -> Duration {
        Duration::from_millis(self.click_ms)
    }

    pub fn command(&self) -> Duration {
        Duration::from_millis(self.command_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            navigation_ms: 30_000,
            network_idle_ms: 10_000,
            content_selector_ms: 3_000,
            settle_ms: 2_000,
            tab_settle_ms: 500,
            load_more_settle_ms: 1_000,
            scroll_settle_ms: 1_500,
            pagination_idle_ms: 5_000,
            visibility_ms: 1_000,
            click_ms: 2_000,
            command_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl Default for SufficiencyPolicy {
    fn default() -> Self {
        Self {
            min_sections: default_min_sections(),
            min_text_length: default_min_text_length(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            selectors: default_noise_selectors(),
            style_pattern: default_noise_style_pattern(),
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_fallback_webdriver_urls() -> Vec<String> {
    vec![
        "http://localhost:9515".to_string(), // ChromeDriver default
        "http://127.0.0.1:4444".to_string(),
    ]
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    10
}

/// Default pagination depth: the opened page plus two more
fn default_max_depth() -> usize {
    3
}

fn default_min_sections() -> usize {
    1
}

fn default_min_text_length() -> usize {
    200
}

fn default_noise_selectors() -> Vec<String> {
    [
        r#"[class*="cookie"]"#,
        r#"[id*="cookie"]"#,
        r#"[class*="consent"]"#,
        r#"[id*="consent"]"#,
        r#"[class*="gdpr"]"#,
        r#"[id*="gdpr"]"#,
        r#"[class*="banner"]"#,
        r#"[role="dialog"]"#,
        r#"[class*="modal"]"#,
        r#"[class*="popup"]"#,
        r#"[class*="overlay"]"#,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_noise_style_pattern() -> String {
    r"(?i)position\s*:\s*(fixed|absolute)".to_string()
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            fallback_webdriver_urls: default_fallback_webdriver_urls(),
            user_agent: default_user_agent(),
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            http_timeout_secs: default_http_timeout_secs(),
            max_redirects: default_max_redirects(),
            max_depth: default_max_depth(),
            sufficiency: SufficiencyPolicy::default(),
            noise: NoiseConfig::default(),
            timings: Timings::default(),
        }
    }
}
