use crate::config::{ConfigError, NoiseConfig};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Tags removed from every document regardless of styling
static ALWAYS_REMOVED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script, style, noscript").expect("static selector"));

/// Removes overlay noise (cookie banners, consent dialogs, modals) from documents
#[derive(Debug)]
pub struct NoiseFilter {
    config: NoiseConfig,
    selectors: Vec<Selector>,
    style_regex: Regex,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(NoiseConfig::default()).expect("Default noise patterns should be valid")
    }
}

impl NoiseFilter {
    /// Create a new noise filter from configuration
    pub fn new(config: NoiseConfig) -> Result<Self, ConfigError> {
        let mut selectors = Vec::with_capacity(config.selectors.len());
        for raw in &config.selectors {
            let selector =
                Selector::parse(raw).map_err(|_| ConfigError::Selector(raw.clone()))?;
            selectors.push(selector);
        }

        let style_regex = Regex::new(&config.style_pattern)?;

        Ok(Self {
            config,
            selectors,
            style_regex,
        })
    }

    /// Whether a candidate element is an overlay rather than page content
    pub fn is_overlay(&self, element: &ElementRef) -> bool {
        let el = element.value();
        if el.name() == "dialog" || el.attr("role") == Some("dialog") {
            return true;
        }

        el.attr("style")
            .is_some_and(|style| self.style_regex.is_match(style))
    }

    /// Detaches noise nodes from the document and returns how many were removed
    pub fn strip(&self, doc: &mut Html) -> usize {
        // Each node once, however many selectors it matches
        let mut seen = HashSet::new();
        let mut doomed = Vec::new();

        let overlays = self
            .selectors
            .iter()
            .flat_map(|selector| doc.select(selector))
            .filter(|element| self.is_overlay(element));
        for element in overlays.chain(doc.select(&ALWAYS_REMOVED)) {
            if seen.insert(element.id()) {
                doomed.push(element.id());
            }
        }

        let mut removed = 0;
        for id in doomed {
            if let Some(mut node) = doc.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }

        ::log::debug!("Noise filter removed {} nodes", removed);
        removed
    }

    /// Browser-side script applying the same candidate list to the live page.
    ///
    /// The live page uses computed style, since overlays are usually positioned
    /// by stylesheets rather than inline styles.
    pub fn removal_script(&self) -> String {
        let selectors =
            serde_json::to_string(&self.config.selectors).unwrap_or_else(|_| "[]".to_string());

        format!(
            r#"
            const selectors = {selectors};
            let removed = 0;
            for (const selector of selectors) {{
                let nodes;
                try {{ nodes = document.querySelectorAll(selector); }} catch (e) {{ continue; }}
                nodes.forEach((el) => {{
                    const position = window.getComputedStyle(el).position;
                    const isDialog = el.tagName === 'DIALOG' || el.getAttribute('role') === 'dialog';
                    if (position === 'fixed' || position === 'absolute' || isDialog) {{
                        el.remove();
                        removed += 1;
                    }}
                }});
            }}
            return removed;
            "#
        )
    }
}
