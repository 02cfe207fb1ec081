use crate::parsers::html::element_text;
use crate::results::Meta;
use crate::urls;
use scraper::{Html, Selector};
use std::sync::LazyLock;

struct MetaSelectors {
    title: Selector,
    description: Selector,
    og_description: Selector,
    canonical: Selector,
}

static SELECTORS: LazyLock<MetaSelectors> = LazyLock::new(|| MetaSelectors {
    title: Selector::parse("title").expect("static selector"),
    description: Selector::parse(r#"meta[name="description"]"#).expect("static selector"),
    og_description: Selector::parse(r#"meta[property="og:description"]"#)
        .expect("static selector"),
    canonical: Selector::parse(r#"link[rel~="canonical"]"#).expect("static selector"),
});

/// Extracts title, description, language and canonical URL.
///
/// Every field falls back to an empty string; extraction never fails.
pub fn extract_meta(doc: &Html, base_url: &str) -> Meta {
    let sel = &*SELECTORS;

    let title = doc
        .select(&sel.title)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let description = [&sel.description, &sel.og_description]
        .into_iter()
        .find_map(|selector| {
            doc.select(selector)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
        })
        .unwrap_or_default()
        .to_string();

    let language = doc
        .root_element()
        .value()
        .attr("lang")
        .map(|lang| lang.trim().to_string())
        .unwrap_or_default();

    let canonical = doc
        .select(&sel.canonical)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| urls::resolve_absolute(base_url, href))
        .find(|href| !href.is_empty())
        .unwrap_or_default();

    Meta {
        title,
        description,
        language,
        canonical,
    }
}
