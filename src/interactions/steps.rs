//! Declarative step tables interpreted by the interaction engine.

use crate::fetchers::session::Target;
use crate::results::ClickKind;
use std::fmt;

/// Longest click text kept in the log
pub const MAX_CLICK_TEXT_CHARS: usize = 50;

/// Scroll iterations attempted before giving up
pub const MAX_SCROLLS: u32 = 3;

/// What a successful action did to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Clicked { text: String },
    Grew { height: u64 },
    Arrived { url: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Clicked { text } => write!(f, "clicked {text:?}"),
            Outcome::Grew { height } => write!(f, "page grew to {height}px"),
            Outcome::Arrived { url } => write!(f, "arrived at {url}"),
        }
    }
}

/// Why an action was skipped; never fatal to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing on the page matches the target
    NoMatch,
    NotVisible,
    /// The bounded wait ran out
    Timeout,
    /// Scrolling did not grow the document
    Unchanged,
    /// Navigation landed on a page already seen
    Revisited(String),
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMatch => f.write_str("no matching element"),
            SkipReason::NotVisible => f.write_str("element not visible"),
            SkipReason::Timeout => f.write_str("timed out"),
            SkipReason::Unchanged => f.write_str("page height unchanged"),
            SkipReason::Revisited(url) => write!(f, "already visited {url}"),
            SkipReason::Failed(message) => f.write_str(message),
        }
    }
}

/// How a click phase walks its candidate targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStrategy {
    /// Click each of the first `limit` matches of the first target that
    /// matches anything, then stop the phase
    EachMatch { limit: usize },
    /// Click the first match of a target repeatedly, moving on when it
    /// disappears; `limit` counts clicks across the whole phase, and the
    /// phase ends once any target has been clicked
    RepeatFirst { limit: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct ClickPhase {
    pub kind: ClickKind,
    pub candidates: &'static [Target],
    pub strategy: ClickStrategy,
}

pub const TABS: ClickPhase = ClickPhase {
    kind: ClickKind::Tab,
    candidates: &[
        Target::Css(r#"[role="tab"]"#),
        Target::Css(".tab"),
        Target::Css(r#"[class*="tab-"]"#),
        Target::Css("button[data-tab]"),
        Target::Css(r#"a[data-toggle="tab"]"#),
    ],
    strategy: ClickStrategy::EachMatch { limit: 5 },
};

pub const LOAD_MORE: ClickPhase = ClickPhase {
    kind: ClickKind::LoadMore,
    candidates: &[
        Target::Text {
            tag: "button",
            text: "Load more",
        },
        Target::Text {
            tag: "button",
            text: "Show more",
        },
        Target::Text {
            tag: "button",
            text: "View more",
        },
        Target::Text {
            tag: "a",
            text: "Load more",
        },
        Target::Css(r#"[class*="load-more"]"#),
        Target::Css(r#"[class*="show-more"]"#),
        Target::Css(r#"button[class*="more"]"#),
    ],
    strategy: ClickStrategy::RepeatFirst { limit: 3 },
};

/// "Next page" controls, in priority order
pub const NEXT_PAGE: &[Target] = &[
    Target::Text {
        tag: "a",
        text: "Next",
    },
    Target::Text { tag: "a", text: ">" },
    Target::Css(r#"[rel="next"]"#),
    Target::Css(".pagination a:last-child"),
    Target::Css(r#"[class*="next"]"#),
    Target::Text {
        tag: "button",
        text: "Next",
    },
];
