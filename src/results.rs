use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page-level metadata. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub title: String,
    pub description: String,
    pub language: String,
    /// Absolute canonical URL
    pub canonical: String,
}

/// Kind of section, derived from the landmark tag that produced it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Header,
    Navigation,
    #[default]
    Content,
    Article,
    Sidebar,
    Footer,
}

impl SectionType {
    /// Maps a landmark tag name to its section type
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "header" => SectionType::Header,
            "nav" => SectionType::Navigation,
            "article" => SectionType::Article,
            "aside" => SectionType::Sidebar,
            "footer" => SectionType::Footer,
            _ => SectionType::Content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A bounded slice of page content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub heading: String,
    pub text: String,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub lists: Vec<Vec<String>>,
    pub tables: Vec<Table>,
    /// Truncated source markup, for provenance only
    pub raw_html: String,
}

impl Section {
    /// Non-trivial text or at least one link, image, list or table
    pub fn has_meaningful_content(&self) -> bool {
        self.text.chars().count() > 20
            || !self.links.is_empty()
            || !self.images.is_empty()
            || !self.lists.is_empty()
            || !self.tables.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickKind {
    Tab,
    LoadMore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    #[serde(rename = "type")]
    pub kind: ClickKind,
    pub selector: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageVisit {
    /// Starts at 2; page 1 is the page the session opened
    pub page_number: u32,
    pub url: String,
}

/// What the interaction engine did to the live page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLog {
    pub clicks: Vec<Click>,
    /// Scroll iterations that grew the document
    pub scrolls: u32,
    pub pages: Vec<PageVisit>,
}

/// Output of a single fetcher, before the dispatcher stamps it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub url: String,
    pub meta: Meta,
    pub sections: Vec<Section>,
    pub interactions: InteractionLog,
}

impl PageContent {
    /// Sum of section text lengths, in characters
    pub fn total_text_len(&self) -> usize {
        self.sections.iter().map(|s| s.text.chars().count()).sum()
    }
}

/// The result returned for every scrape request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModel {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub meta: Meta,
    pub sections: Vec<Section>,
    pub interactions: InteractionLog,
    pub errors: Vec<String>,
}

impl ContentModel {
    /// Attaches the timestamp to a successful fetch
    pub fn stamped(page: PageContent, scraped_at: DateTime<Utc>) -> Self {
        Self {
            url: page.url,
            scraped_at,
            meta: page.meta,
            sections: page.sections,
            interactions: page.interactions,
            errors: Vec::new(),
        }
    }

    /// An empty result that explains why the fetch failed
    pub fn degraded(url: &str, message: String, scraped_at: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            scraped_at,
            meta: Meta::default(),
            sections: Vec::new(),
            interactions: InteractionLog::default(),
            errors: vec![message],
        }
    }
}

/// Response envelope: the model under a single `result` key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub result: ContentModel,
}

impl From<ContentModel> for ScrapeResponse {
    fn from(result: ContentModel) -> Self {
        Self { result }
    }
}
