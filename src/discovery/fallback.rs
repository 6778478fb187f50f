use super::{Candidate, DiscoveredId, DocumentContext, UniqueNodes, select_all};
use crate::site::canonical_link;
use crate::utils::{parent_element, pattern};
use std::collections::HashSet;

/// Anchors pointing at post detail pages
const LISTING_ANCHOR_SELECTOR: &str = "a[href*='/explore/']";

/// Post ids embedded in serialized markup
const MARKUP_ID_PATTERN: &str = r"note/([a-zA-Z0-9]{6,})";

/// Class tokens containing any of these are tried as card selectors
const CLASS_KEYWORDS: [&str; 6] = ["note", "feed", "card", "item", "post", "article"];

/// A discovered class matching this many elements or more is too generic
const MAX_CLASS_MATCHES: usize = 100;

/// Uses the parent and grandparent of every listing anchor as candidates.
/// When no anchor has a parent element the anchors themselves are returned.
pub fn listing_anchor_parents<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    let anchors = select_all(ctx.doc, LISTING_ANCHOR_SELECTOR);
    if anchors.is_empty() {
        return None;
    }
    ctx.sink.info(&format!(
        "Found {} links to note pages",
        anchors.len()
    ));

    let mut containers = UniqueNodes::default();
    for anchor in &anchors {
        if let Some(parent) = parent_element(anchor) {
            containers.push(parent);
            if let Some(grandparent) = parent_element(&parent) {
                containers.push(grandparent);
            }
        }
    }

    if containers.is_empty() {
        return Some(anchors.into_iter().map(Candidate::Node).collect());
    }
    ctx.sink.info(&format!(
        "Collected {} containers around note links",
        containers.len()
    ));
    Some(containers.into_candidates())
}

/// Last resort: recovers distinct post ids from the raw markup
pub fn markup_ids<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    let re = pattern(MARKUP_ID_PATTERN)?;
    let html = ctx.doc.html();

    let mut seen = HashSet::new();
    let ids: Vec<Candidate<'a>> = re
        .captures_iter(&html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .filter(|id| seen.insert(id.clone()))
        .map(|id| {
            Candidate::Id(DiscoveredId {
                link: canonical_link(&id),
                id,
            })
        })
        .collect();

    if ids.is_empty() {
        return None;
    }
    ctx.sink.info(&format!(
        "Extracted {} note ids directly from the page markup",
        ids.len()
    ));
    Some(ids)
}

/// Tries every card-like class token on the page as a selector and accepts
/// the first matching fewer than [`MAX_CLASS_MATCHES`] elements.
pub fn class_scan<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    let elements = select_all(ctx.doc, "[class]");

    let mut seen = HashSet::new();
    let tokens: Vec<&str> = elements
        .iter()
        .flat_map(|el| el.value().classes())
        .filter(|class| seen.insert(*class))
        .filter(|class| CLASS_KEYWORDS.iter().any(|k| class.contains(k)))
        .collect();

    for token in tokens {
        let matches: Vec<_> = elements
            .iter()
            .filter(|el| el.value().classes().any(|c| c == token))
            .copied()
            .collect();

        if !matches.is_empty() && matches.len() < MAX_CLASS_MATCHES {
            ctx.sink.info(&format!(
                "Discovered class \".{}\" matched {} elements",
                token,
                matches.len()
            ));
            return Some(matches.into_iter().map(Candidate::Node).collect());
        }
    }

    None
}
