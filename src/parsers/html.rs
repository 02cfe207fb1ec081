use crate::filter::NoiseFilter;
use crate::parsers::text;
use scraper::{ElementRef, Html, Selector};

/// Parses an HTML document and strips noise from it
pub fn parse_clean(html: &str, noise: &NoiseFilter) -> Html {
    let mut doc = Html::parse_document(html);
    noise.strip(&mut doc);
    doc
}

/// Visible text of an element, whitespace collapsed
pub fn element_text(element: &ElementRef) -> String {
    text::join_fragments(element.text())
}

/// Visible text of several elements joined with single spaces
pub fn scope_text(scope: &[ElementRef]) -> String {
    text::join_fragments(scope.iter().flat_map(|el| el.text()))
}

/// Elements in `scope` matching `selector`, in document order.
///
/// Unlike [`ElementRef::select`], each scope element is itself a candidate, so a
/// `<ul>` sitting directly after a heading counts as that heading's list.
pub fn select_in_scope<'a, 'b>(
    scope: &'b [ElementRef<'a>],
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    scope.iter().flat_map(move |el| {
        let own = selector.matches(el).then_some(*el);
        own.into_iter().chain(el.select(selector))
    })
}

/// Direct element children of `element` with the given tag name
pub fn child_elements<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}
