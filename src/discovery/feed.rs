use super::{
    Candidate, DocumentContext, UniqueNodes, first_matching_selector, scoped_style_elements,
    select_all,
};
use crate::utils::parent_element;

/// Card class names the feed has used, most specific first
const STRUCTURAL_SELECTORS: [&str; 7] = [
    ".note-item, .feed-item",
    ".content-item, .note-card",
    "article, .post-item, .feed-card",
    ".cover-item",
    ".homefeed-card",
    ".card-container",
    ".card-wrap",
];

/// Substring and attribute patterns, tried once structural classes fail
const ATTRIBUTE_SELECTORS: [&str; 5] = [
    "[class*=\"note\"][class*=\"item\"]",
    "[class*=\"feed\"][class*=\"item\"]",
    ".explore-feed a[href*=\"xhslink.com\"], a[href*=\"/explore/\"]",
    "div[data-note-id]",
    "[class*=\"card\"]",
];

/// Cover images whose ancestors are likely cards
const COVER_IMAGE_SELECTOR: &str =
    "img[class*=\"cover\"], img[class*=\"note\"], img[class*=\"feed\"]";

/// How many ancestors of a cover image are taken as candidates
const IMAGE_ANCESTOR_DEPTH: usize = 3;

pub fn structural_selectors<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    if let Some(found) = first_matching_selector(ctx, &STRUCTURAL_SELECTORS) {
        return Some(found);
    }

    let cards = scoped_style_elements(ctx.doc, "card");
    if cards.is_empty() {
        return None;
    }
    ctx.sink.info(&format!(
        "Scoped-style cards matched {} elements",
        cards.len()
    ));
    Some(cards.into_iter().map(Candidate::Node).collect())
}

pub fn attribute_selectors<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    first_matching_selector(ctx, &ATTRIBUTE_SELECTORS)
}

/// Treats the nearest ancestors of every cover image as candidate cards
pub fn image_ancestors<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    let images = select_all(ctx.doc, COVER_IMAGE_SELECTOR);
    if images.is_empty() {
        return None;
    }
    ctx.sink.info(&format!(
        "Found {} cover images, using their containers",
        images.len()
    ));

    let mut candidates = UniqueNodes::default();
    for image in images {
        let mut current = parent_element(&image);
        for _ in 0..IMAGE_ANCESTOR_DEPTH {
            let Some(ancestor) = current else {
                break;
            };
            candidates.push(ancestor);
            current = parent_element(&ancestor);
        }
    }

    Some(candidates.into_candidates())
}
