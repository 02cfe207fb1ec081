use crate::parsers::sections::{
    MAX_IMAGES, MAX_LINKS, MAX_LIST_ITEMS, MAX_LISTS, MAX_RAW_HTML_CHARS, MAX_TABLE_ROWS,
    MAX_TABLES, MAX_TEXT_CHARS, SectionBuilder,
};
use crate::results::{Image, Link, Section, SectionType, Table};
use scraper::Html;

const BASE: &str = "https://x.com/blog/post";

fn build(html: &str) -> Vec<Section> {
    let doc = Html::parse_document(html);
    SectionBuilder::new(BASE).build(&doc)
}

fn ids(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.id.as_str()).collect()
}

#[cfg(test)]
mod pass_selection_tests {
    use super::*;

    #[test]
    fn test_landmark_pass_used_exclusively() {
        let sections = build(
            r#"<html><body>
                <header><h1>Site</h1><a href="/">Home</a></header>
                <main><h2>Welcome</h2><p>This is the main content of the page.</p></main>
                <h2>Loose heading</h2><p>Text outside of any landmark element here.</p>
                <footer><p>Copyright 2024 Example Corp, all rights reserved</p></footer>
            </body></html>"#,
        );

        assert_eq!(ids(&sections), vec!["header-0", "main-1", "footer-2"]);
        assert_eq!(sections[0].kind, SectionType::Header);
        assert_eq!(sections[0].heading, "Site");
        assert_eq!(sections[1].kind, SectionType::Content);
        assert_eq!(sections[1].heading, "Welcome");
        assert_eq!(sections[2].kind, SectionType::Footer);
        // No heading inside the footer, so the tag name is used
        assert_eq!(sections[2].heading, "Footer");
    }

    #[test]
    fn test_landmark_types_and_dropped_indices() {
        let sections = build(
            r#"<body>
                <nav><a href="/a">Alpha</a><a href="/b">Beta</a></nav>
                <section></section>
                <article><h3>Story</h3><p>An article body that is long enough.</p></article>
                <aside><img src="/side.png" alt="ad"></aside>
            </body>"#,
        );

        // The empty section keeps its index even though it is dropped
        assert_eq!(ids(&sections), vec!["nav-0", "article-2", "aside-3"]);
        assert_eq!(sections[0].kind, SectionType::Navigation);
        assert_eq!(sections[0].heading, "Nav");
        assert_eq!(sections[1].kind, SectionType::Article);
        assert_eq!(sections[2].kind, SectionType::Sidebar);
        assert_eq!(sections[2].heading, "Aside");
    }

    #[test]
    fn test_heading_pass_without_landmarks() {
        let para = "p".repeat(220);
        let sections = build(&format!(
            "<html><body><h1>A</h1><p>{para}</p><h2>B</h2><p>Second section body text.</p></body></html>"
        ));

        assert_eq!(ids(&sections), vec!["section-0", "section-1"]);
        assert_eq!(sections[0].heading, "A");
        assert_eq!(sections[1].heading, "B");
        assert!(sections.iter().all(|s| s.kind == SectionType::Content));
        assert_eq!(sections[0].text, para);
        assert_eq!(sections[1].text, "Second section body text.");
    }

    #[test]
    fn test_empty_landmark_heading_is_kept() {
        let sections = build(
            r#"<body>
                <header><h1></h1><a href="/">Home</a></header>
                <footer><p>Copyright 2024 Example Corp, all rights reserved</p></footer>
            </body>"#,
        );

        assert_eq!(ids(&sections), vec!["header-0", "footer-1"]);
        assert_eq!(sections[0].heading, "");
        assert_eq!(sections[1].heading, "Footer");
    }

    #[test]
    fn test_short_second_heading_section_dropped() {
        let para = "p".repeat(220);
        let sections = build(&format!("<h1>A</h1><p>{para}</p><h2>B</h2><p>text</p>"));

        assert_eq!(ids(&sections), vec!["section-0"]);
        assert_eq!(sections[0].heading, "A");
        assert_eq!(sections[0].text, para);
    }

    #[test]
    fn test_single_landmark_falls_through_to_headings() {
        let sections = build(
            r#"<body>
                <nav><a href="/a">Alpha</a></nav>
                <h1>Title</h1><p>Paragraph under the title heading.</p>
            </body>"#,
        );

        assert_eq!(ids(&sections), vec!["section-0"]);
        assert_eq!(sections[0].heading, "Title");
    }

    #[test]
    fn test_single_landmark_without_headings_uses_body() {
        let sections = build("<body><main><p>Some long enough paragraph in main.</p></main></body>");

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "section-0");
        assert_eq!(sections[0].heading, "Main Content");
        assert_eq!(sections[0].text, "Some long enough paragraph in main.");
    }

    #[test]
    fn test_minimal_document_gets_one_fallback_section() {
        for html in ["", "<html><body><p>hi</p></body></html>"] {
            let sections = build(html);
            assert_eq!(sections.len(), 1, "input: {:?}", html);
            assert_eq!(sections[0].id, "section-0");
            assert_eq!(sections[0].kind, SectionType::Content);
            assert_eq!(sections[0].heading, "Main Content");
        }
        assert_eq!(build("<p>hi</p>")[0].text, "hi");
    }
}

#[cfg(test)]
mod heading_scope_tests {
    use super::*;

    #[test]
    fn test_scope_stops_at_next_section_heading_only() {
        let sections = build(
            "<body><h2>B</h2><p>Intro text for B.</p><h4>Sub</h4><p>More text.</p><h3>C</h3><p>Text that belongs to C.</p></body>",
        );

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].text, "Intro text for B. Sub More text.");
        assert_eq!(sections[1].text, "Text that belongs to C.");
    }

    #[test]
    fn test_raw_html_is_heading_plus_three_siblings() {
        let sections = build(
            "<body><h1>A</h1><p>alpha alpha alpha</p><p>beta</p><p>gamma</p><p>delta</p></body>",
        );

        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].raw_html,
            "<h1>A</h1><p>alpha alpha alpha</p><p>beta</p><p>gamma</p>"
        );
        assert_eq!(sections[0].text, "alpha alpha alpha beta gamma delta");
    }

    #[test]
    fn test_sibling_list_belongs_to_heading() {
        let sections = build("<body><h2>Steps</h2><ol><li>First</li><li>Second</li></ol></body>");

        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].lists,
            vec![vec!["First".to_string(), "Second".to_string()]]
        );
    }

    #[test]
    fn test_heading_without_content_dropped() {
        let sections = build(
            "<body><h1>Empty</h1><h2>Full</h2><p>This section has plenty of text.</p></body>",
        );

        // Indices follow heading order, including dropped headings
        assert_eq!(ids(&sections), vec!["section-1"]);
    }
}

#[cfg(test)]
mod field_tests {
    use super::*;

    #[test]
    fn test_links_resolved_and_filtered() {
        let sections = build(
            r##"<body><h1>Links</h1><div>
                <a href="/about">About us</a>
                <a href="contact">Contact</a>
                <a href="">Empty href</a>
                <a href="/icon"><img src="/i.png"></a>
                <a>No href</a>
                <a href="https://other.org/x">  Other   site </a>
            </div></body>"##,
        );

        assert_eq!(
            sections[0].links,
            vec![
                Link {
                    text: "About us".into(),
                    url: "https://x.com/about".into()
                },
                Link {
                    text: "Contact".into(),
                    url: "https://x.com/blog/contact".into()
                },
                Link {
                    text: "Other site".into(),
                    url: "https://other.org/x".into()
                },
            ]
        );
        assert_eq!(sections[0].images.len(), 1);
    }

    #[test]
    fn test_link_cap() {
        let anchors: String = (0..500)
            .map(|i| format!(r#"<a href="/p/{i}">Link {i}</a>"#))
            .collect();
        let sections = build(&format!("<body><h1>Many</h1><div>{anchors}</div></body>"));

        assert_eq!(sections[0].links.len(), MAX_LINKS);
        assert_eq!(sections[0].links[0].url, "https://x.com/p/0");
        assert_eq!(sections[0].links[19].url, "https://x.com/p/19");
    }

    #[test]
    fn test_text_cap() {
        let para = "w".repeat(10_000);
        let sections = build(&format!("<body><h1>Long</h1><p>{para}</p></body>"));

        assert_eq!(sections[0].text.chars().count(), MAX_TEXT_CHARS);
        assert!(sections[0].raw_html.ends_with("..."));
        assert_eq!(sections[0].raw_html.chars().count(), MAX_RAW_HTML_CHARS + 3);
    }

    #[test]
    fn test_images() {
        let imgs: String = (0..15)
            .map(|i| format!(r#"<img src="/img/{i}.png" alt="pic {i}">"#))
            .collect();
        let sections = build(&format!(
            r#"<body><h1>Gallery</h1><div><img src="/img/a.png"><img src="" alt="none">{imgs}</div></body>"#
        ));

        let images = &sections[0].images;
        assert_eq!(images.len(), MAX_IMAGES);
        assert_eq!(
            images[0],
            Image {
                src: "https://x.com/img/a.png".into(),
                alt: String::new()
            }
        );
        assert_eq!(images[1].alt, "pic 0");
    }

    #[test]
    fn test_nested_lists() {
        let sections = build(
            "<body><h1>Lists</h1><ul><li>One</li><li>Two<ul><li>Inner</li></ul></li></ul></body>",
        );

        assert_eq!(
            sections[0].lists,
            vec![
                vec!["One".to_string(), "Two Inner".to_string()],
                vec!["Inner".to_string()],
            ]
        );
    }

    #[test]
    fn test_list_caps() {
        let items: String = (0..12).map(|i| format!("<li>item {i}</li>")).collect();
        let lists: String = (0..7).map(|_| format!("<ul>{items}</ul>")).collect();
        let sections = build(&format!("<body><h1>Lists</h1><div>{lists}</div></body>"));

        assert_eq!(sections[0].lists.len(), MAX_LISTS);
        assert!(sections[0].lists.iter().all(|l| l.len() == MAX_LIST_ITEMS));
    }

    #[test]
    fn test_tables() {
        let sections = build(
            "<body><h1>T</h1>
            <table><tr><th>Name</th><th>Age</th></tr><tr><td>Ann</td><td>30</td></tr><tr><td>Bob</td><td>25</td></tr></table>
            <table></table>
            </body>",
        );

        assert_eq!(
            sections[0].tables,
            vec![Table {
                headers: vec!["Name".into(), "Age".into()],
                rows: vec![
                    vec!["Ann".into(), "30".into()],
                    vec!["Bob".into(), "25".into()],
                ],
            }]
        );
    }

    #[test]
    fn test_table_caps() {
        let rows: String = (0..15).map(|i| format!("<tr><td>{i}</td></tr>")).collect();
        let tables: String = (0..4).map(|_| format!("<table>{rows}</table>")).collect();
        let sections = build(&format!("<body><h1>Tables</h1><div>{tables}</div></body>"));

        assert_eq!(sections[0].tables.len(), MAX_TABLES);
        assert!(
            sections[0]
                .tables
                .iter()
                .all(|t| t.rows.len() == MAX_TABLE_ROWS && t.headers.is_empty())
        );
    }

    #[test]
    fn test_landmark_raw_html_is_whole_element() {
        let sections = build(
            r#"<body><header><a href="/">Home</a></header><footer><a href="/t">Terms</a></footer></body>"#,
        );

        assert_eq!(sections[0].raw_html, r#"<header><a href="/">Home</a></header>"#);
        assert_eq!(sections[1].raw_html, r#"<footer><a href="/t">Terms</a></footer>"#);
    }
}
