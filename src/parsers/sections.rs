//! Reduction of a cleaned document to a bounded list of sections.
//!
//! Three passes, first one that produces enough output wins:
//! landmarks (`header`, `nav`, `main`, ...), then h1-h3 headings with their
//! following siblings, then a single section covering the body.

use crate::parsers::html::{child_elements, element_text, scope_text, select_in_scope};
use crate::parsers::text;
use crate::results::{Image, Link, Section, SectionType, Table};
use crate::urls;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub const MAX_TEXT_CHARS: usize = 2000;
pub const MAX_LINKS: usize = 20;
pub const MAX_IMAGES: usize = 10;
pub const MAX_LISTS: usize = 5;
pub const MAX_LIST_ITEMS: usize = 10;
pub const MAX_TABLES: usize = 3;
pub const MAX_TABLE_ROWS: usize = 10;
pub const MAX_RAW_HTML_CHARS: usize = 500;

/// Landmark pass output below this size is discarded in favor of headings
const MIN_LANDMARK_SECTIONS: usize = 2;

/// Following elements serialized into a heading section's raw markup
const RAW_HTML_SIBLINGS: usize = 3;

const FALLBACK_HEADING: &str = "Main Content";

struct SectionSelectors {
    landmarks: Selector,
    landmark_heading: Selector,
    section_heading: Selector,
    body: Selector,
    links: Selector,
    images: Selector,
    lists: Selector,
    tables: Selector,
    table_headers: Selector,
    table_rows: Selector,
    table_cells: Selector,
}

fn compile(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

static SELECTORS: LazyLock<SectionSelectors> = LazyLock::new(|| SectionSelectors {
    landmarks: compile("header, nav, main, article, section, aside, footer"),
    landmark_heading: compile("h1, h2, h3, h4"),
    section_heading: compile("h1, h2, h3"),
    body: compile("body"),
    links: compile("a[href]"),
    images: compile("img[src]"),
    lists: compile("ul, ol"),
    tables: compile("table"),
    table_headers: compile("th"),
    table_rows: compile("tr"),
    table_cells: compile("td"),
});

/// Builds sections for one document, resolving URLs against `base_url`
pub struct SectionBuilder<'u> {
    base_url: &'u str,
}

impl<'u> SectionBuilder<'u> {
    pub fn new(base_url: &'u str) -> Self {
        Self { base_url }
    }

    /// Runs the landmark, heading and body passes; never returns an empty list
    pub fn build(&self, doc: &Html) -> Vec<Section> {
        let landmarks = self.landmark_sections(doc);
        if landmarks.len() >= MIN_LANDMARK_SECTIONS {
            ::log::debug!("Using {} landmark sections", landmarks.len());
            return landmarks;
        }

        let headed = self.heading_sections(doc);
        if !headed.is_empty() {
            ::log::debug!("Using {} heading sections", headed.len());
            return headed;
        }

        ::log::debug!("No landmark or heading sections, falling back to body");
        vec![self.fallback_section(doc)]
    }

    /// One section per landmark element, in document order
    pub fn landmark_sections(&self, doc: &Html) -> Vec<Section> {
        let sel = &*SELECTORS;

        doc.select(&sel.landmarks)
            .enumerate()
            .map(|(idx, landmark)| {
                let tag = landmark.value().name();
                // An existing heading wins even when it has no text
                let heading = landmark
                    .select(&sel.landmark_heading)
                    .next()
                    .map(|h| element_text(&h))
                    .unwrap_or_else(|| text::title_case(tag));

                self.section(
                    format!("{tag}-{idx}"),
                    SectionType::from_tag(tag),
                    heading,
                    &[landmark],
                    landmark.html(),
                )
            })
            .filter(Section::has_meaningful_content)
            .collect()
    }

    /// One section per h1-h3, scoped to the siblings up to the next such heading
    pub fn heading_sections(&self, doc: &Html) -> Vec<Section> {
        let sel = &*SELECTORS;

        doc.select(&sel.section_heading)
            .enumerate()
            .map(|(idx, heading)| {
                let scope: Vec<ElementRef> = heading
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .take_while(|sibling| !sel.section_heading.matches(sibling))
                    .collect();

                let mut raw = heading.html();
                for sibling in scope.iter().take(RAW_HTML_SIBLINGS) {
                    raw.push_str(&sibling.html());
                }

                self.section(
                    format!("section-{idx}"),
                    SectionType::Content,
                    element_text(&heading),
                    &scope,
                    raw,
                )
            })
            .filter(Section::has_meaningful_content)
            .collect()
    }

    /// A single section covering the body (or the whole document without one)
    pub fn fallback_section(&self, doc: &Html) -> Section {
        let body = doc
            .select(&SELECTORS.body)
            .next()
            .unwrap_or_else(|| doc.root_element());

        self.section(
            "section-0".to_string(),
            SectionType::Content,
            FALLBACK_HEADING.to_string(),
            &[body],
            body.html(),
        )
    }

    fn section(
        &self,
        id: String,
        kind: SectionType,
        heading: String,
        scope: &[ElementRef],
        raw_html: String,
    ) -> Section {
        Section {
            id,
            kind,
            heading,
            text: text::truncate_chars(&scope_text(scope), MAX_TEXT_CHARS),
            links: self.links(scope),
            images: self.images(scope),
            lists: lists(scope),
            tables: tables(scope),
            raw_html: text::truncate_markup(&raw_html, MAX_RAW_HTML_CHARS),
        }
    }

    fn links(&self, scope: &[ElementRef]) -> Vec<Link> {
        select_in_scope(scope, &SELECTORS.links)
            .filter_map(|anchor| {
                let text = element_text(&anchor);
                let href = anchor.value().attr("href")?;
                let url = urls::resolve_absolute(self.base_url, href);
                (!text.is_empty() && !url.is_empty()).then_some(Link { text, url })
            })
            .take(MAX_LINKS)
            .collect()
    }

    fn images(&self, scope: &[ElementRef]) -> Vec<Image> {
        select_in_scope(scope, &SELECTORS.images)
            .filter_map(|img| {
                let src = urls::resolve_absolute(self.base_url, img.value().attr("src")?);
                let alt = img.value().attr("alt").unwrap_or_default().to_string();
                (!src.is_empty()).then_some(Image { src, alt })
            })
            .take(MAX_IMAGES)
            .collect()
    }
}

/// Direct `li` items of every list; nested lists form their own entries
fn lists(scope: &[ElementRef]) -> Vec<Vec<String>> {
    select_in_scope(scope, &SELECTORS.lists)
        .filter_map(|list| {
            let items: Vec<String> = child_elements(list, "li")
                .take(MAX_LIST_ITEMS)
                .map(|li| element_text(&li))
                .collect();
            (!items.is_empty()).then_some(items)
        })
        .take(MAX_LISTS)
        .collect()
}

/// Headers from every `th`; rows from each `tr` that has `td` cells
fn tables(scope: &[ElementRef]) -> Vec<Table> {
    let sel = &*SELECTORS;

    select_in_scope(scope, &sel.tables)
        .filter_map(|table| {
            let headers: Vec<String> = table
                .select(&sel.table_headers)
                .map(|th| element_text(&th))
                .collect();

            let rows: Vec<Vec<String>> = table
                .select(&sel.table_rows)
                .map(|tr| {
                    tr.select(&sel.table_cells)
                        .map(|td| element_text(&td))
                        .collect::<Vec<_>>()
                })
                .filter(|cells| !cells.is_empty())
                .take(MAX_TABLE_ROWS)
                .collect();

            (!headers.is_empty() || !rows.is_empty()).then_some(Table { headers, rows })
        })
        .take(MAX_TABLES)
        .collect()
}
