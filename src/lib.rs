// Re-export modules
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod interactions;
pub mod parsers;
pub mod results;
pub mod urls;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ScraperConfig};
pub use dispatch::Dispatcher;
pub use error::ScrapeError;
pub use results::{ContentModel, ScrapeResponse};

use fetchers::{RenderedFetcher, StaticFetcher, WebDriverLauncher};
use filter::NoiseFilter;
use parsers::Parser;
use std::sync::Arc;

/// Environment variable overriding the configured WebDriver endpoint
pub const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// Main builder for a configured scrape pipeline
#[derive(Debug, Clone, Default)]
pub struct Scraper {
    config: ScraperConfig,
    webdriver_url: Option<String>,
}

impl Scraper {
    /// Create a new Scraper builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, ConfigError> {
        let config = ScraperConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set how many pages pagination may cover, counting the first
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the WebDriver endpoint; takes precedence over the environment
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Wire the fetchers together into a dispatcher
    pub fn build(self) -> Result<Dispatcher, ScrapeError> {
        let mut config = self.config;
        config.webdriver_url = resolve_webdriver_url(
            self.webdriver_url,
            std::env::var(WEBDRIVER_URL_ENV).ok(),
            config.webdriver_url,
        );
        ::log::debug!("Using WebDriver at {}", config.webdriver_url);

        let noise = NoiseFilter::new(config.noise.clone())
            .map_err(|e| ScrapeError::Internal(format!("invalid noise configuration: {e}")))?;
        let parser = Arc::new(Parser::new(noise));

        let static_fetcher = StaticFetcher::new(&config, Arc::clone(&parser))?;
        let launcher = Arc::new(WebDriverLauncher::new(&config));
        let rendered_fetcher = RenderedFetcher::new(launcher, parser, &config);

        Ok(Dispatcher::new(
            Box::new(static_fetcher),
            Box::new(rendered_fetcher),
            config.sufficiency,
        ))
    }
}

/// Explicit setting, then a non-empty environment value, then the configured URL
fn resolve_webdriver_url(
    explicit: Option<String>,
    from_env: Option<String>,
    configured: String,
) -> String {
    explicit
        .or(from_env.filter(|url| !url.is_empty()))
        .unwrap_or(configured)
}

/// Scrape `url` with the default configuration
pub async fn scrape(url: &str) -> Result<ContentModel, ScrapeError> {
    Scraper::new().build()?.scrape(url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webdriver_url_precedence() {
        let configured = "http://localhost:4444".to_string();
        assert_eq!(
            resolve_webdriver_url(None, None, configured.clone()),
            "http://localhost:4444"
        );
        assert_eq!(
            resolve_webdriver_url(None, Some(String::new()), configured.clone()),
            "http://localhost:4444"
        );
        assert_eq!(
            resolve_webdriver_url(None, Some("http://grid:4444".into()), configured.clone()),
            "http://grid:4444"
        );
        assert_eq!(
            resolve_webdriver_url(
                Some("http://local:9515".into()),
                Some("http://grid:4444".into()),
                configured
            ),
            "http://local:9515"
        );
    }

    #[test]
    fn test_builder_settings() {
        let scraper = Scraper::new()
            .with_config_str(r#"{"max_depth": 5, "headless": false}"#)
            .unwrap()
            .with_max_depth(2);
        assert_eq!(scraper.config().max_depth, 2);
        assert!(!scraper.config().headless);
    }

    #[test]
    fn test_invalid_config_str() {
        assert!(Scraper::new().with_config_str("{ nope").is_err());
    }

    #[test]
    fn test_invalid_noise_selector_fails_build() {
        let scraper = Scraper::new()
            .with_config_str(r#"{"noise": {"selectors": ["[[broken"]}}"#)
            .unwrap();
        assert!(matches!(scraper.build(), Err(ScrapeError::Internal(_))));
    }

    #[tokio::test]
    async fn test_scrape_rejects_invalid_url() {
        let err = scrape("mailto:someone@example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl(_)));
    }
}
