//! Locating the elements that represent individual posts.
//!
//! The host page's class names are generated by its front-end framework and
//! change between sessions, so discovery is an ordered cascade of strategies
//! running from the most specific selectors to raw markup scanning. The first
//! strategy that yields at least one candidate wins.

pub mod fallback;
pub mod feed;
pub mod profile;


use crate::diagnostics::Diagnostics;
use crate::site::PageContext;
use crate::utils::selector;
use scraper::{ElementRef, Html};

/// A post id recovered from raw markup, with no element behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredId {
    pub id: String,
    pub link: String,
}

/// Something believed to represent one post
#[derive(Debug, Clone)]
pub enum Candidate<'a> {
    /// A live element of the parsed document
    Node(ElementRef<'a>),
    /// A post known only by its id
    Id(DiscoveredId),
}

impl<'a> Candidate<'a> {
    pub fn as_node(&self) -> Option<&ElementRef<'a>> {
        match self {
            Candidate::Node(element) => Some(element),
            Candidate::Id(_) => None,
        }
    }
}

/// What a strategy sees: the parsed document and the diagnostics sink
pub struct DocumentContext<'a, 's> {
    pub doc: &'a Html,
    pub sink: &'s dyn Diagnostics,
}

/// A single discovery strategy; `None` means it found nothing
pub type StrategyFn = for<'a, 's> fn(&DocumentContext<'a, 's>) -> Option<Vec<Candidate<'a>>>;

#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub run: StrategyFn,
}

/// Cascade for a single user's note listing
pub const PROFILE_STRATEGIES: [Strategy; 5] = [
    Strategy {
        name: "profile selectors",
        run: profile::profile_selectors,
    },
    Strategy {
        name: "listing containers",
        run: profile::listing_containers,
    },
    Strategy {
        name: "listing anchor parents",
        run: fallback::listing_anchor_parents,
    },
    Strategy {
        name: "markup ids",
        run: fallback::markup_ids,
    },
    Strategy {
        name: "class scan",
        run: fallback::class_scan,
    },
];

/// Cascade for feed, explore and search pages
pub const FEED_STRATEGIES: [Strategy; 5] = [
    Strategy {
        name: "structural selectors",
        run: feed::structural_selectors,
    },
    Strategy {
        name: "attribute selectors",
        run: feed::attribute_selectors,
    },
    Strategy {
        name: "image ancestors",
        run: feed::image_ancestors,
    },
    Strategy {
        name: "listing anchor parents",
        run: fallback::listing_anchor_parents,
    },
    Strategy {
        name: "class scan",
        run: fallback::class_scan,
    },
];

/// Candidates found on a page, with the strategy that found them
#[derive(Debug, Clone, Default)]
pub struct Discovery<'a> {
    pub candidates: Vec<Candidate<'a>>,
    pub strategy: Option<&'static str>,
}

impl Discovery<'_> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Runs strategies in order and returns the first non-empty result
pub fn first_success<'a>(
    ctx: &DocumentContext<'a, '_>,
    strategies: &[Strategy],
) -> Option<(&'static str, Vec<Candidate<'a>>)> {
    strategies.iter().find_map(|strategy| {
        match (strategy.run)(ctx).filter(|found| !found.is_empty()) {
            Some(found) => {
                ctx.sink.info(&format!(
                    "Strategy \"{}\" found {} candidate elements",
                    strategy.name,
                    found.len()
                ));
                Some((strategy.name, found))
            }
            None => {
                ctx.sink
                    .debug(&format!("Strategy \"{}\" found nothing", strategy.name));
                None
            }
        }
    })
}

/// Finds the post candidates on a rendered page. Never fails; an exhausted
/// cascade yields an empty discovery and a "no elements found" warning.
pub fn discover<'a>(doc: &'a Html, page: PageContext, sink: &dyn Diagnostics) -> Discovery<'a> {
    let ctx = DocumentContext { doc, sink };
    let strategies: &[Strategy] = if page.is_user_profile_listing {
        sink.info("Looking for notes on a user profile listing");
        &PROFILE_STRATEGIES
    } else {
        &FEED_STRATEGIES
    };

    match first_success(&ctx, strategies) {
        Some((name, candidates)) => Discovery {
            candidates,
            strategy: Some(name),
        },
        None => {
            sink.warn("No post elements found on the page");
            Discovery::default()
        }
    }
}

/// Elements matching the first selector in `selectors` that matches anything
pub(crate) fn first_matching_selector<'a>(
    ctx: &DocumentContext<'a, '_>,
    selectors: &[&str],
) -> Option<Vec<Candidate<'a>>> {
    for css in selectors {
        let found = select_all(ctx.doc, css);
        if !found.is_empty() {
            ctx.sink.info(&format!(
                "Selector \"{}\" matched {} elements",
                css,
                found.len()
            ));
            return Some(found.into_iter().map(Candidate::Node).collect());
        }
    }
    None
}

/// Every element in the document matching `css`, in document order
pub(crate) fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => doc.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Elements carrying `class` plus a framework scoped-style attribute (`data-v-<hash>`)
pub(crate) fn scoped_style_elements<'a>(doc: &'a Html, class: &str) -> Vec<ElementRef<'a>> {
    select_all(doc, "[class]")
        .into_iter()
        .filter(|el| el.value().classes().any(|c| c == class))
        .filter(|el| el.value().attrs().any(|(name, _)| name.starts_with("data-v-")))
        .collect()
}

/// Collects elements in order, keeping only the first occurrence of each node.
/// Element equality is node identity within the document tree.
#[derive(Default)]
pub(crate) struct UniqueNodes<'a> {
    nodes: Vec<ElementRef<'a>>,
}

impl<'a> UniqueNodes<'a> {
    pub fn push(&mut self, element: ElementRef<'a>) {
        if !self.nodes.contains(&element) {
            self.nodes.push(element);
        }
    }

    pub fn into_candidates(self) -> Vec<Candidate<'a>> {
        self.nodes.into_iter().map(Candidate::Node).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
