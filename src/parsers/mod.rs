pub mod html;
pub mod meta;
pub mod sections;
pub mod text;

#[cfg(test)]
mod tests;

use crate::filter::NoiseFilter;
use crate::results::{Meta, Section};
use sections::SectionBuilder;

/// Result of reducing one HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub meta: Meta,
    pub sections: Vec<Section>,
}

/// Turns raw HTML into the content model; shared by both fetch paths
#[derive(Debug, Default)]
pub struct Parser {
    noise: NoiseFilter,
}

impl Parser {
    pub fn new(noise: NoiseFilter) -> Self {
        Self { noise }
    }

    pub fn noise(&self) -> &NoiseFilter {
        &self.noise
    }

    /// Strips noise, then extracts meta and sections with URLs resolved against `base_url`
    pub fn parse(&self, content: &str, base_url: &str) -> ParsedPage {
        let doc = html::parse_clean(content, &self.noise);

        let meta = meta::extract_meta(&doc, base_url);
        let sections = SectionBuilder::new(base_url).build(&doc);

        ::log::debug!(
            "Parsed {} sections from {} ({} bytes of HTML)",
            sections.len(),
            base_url,
            content.len()
        );

        ParsedPage { meta, sections }
    }
}
