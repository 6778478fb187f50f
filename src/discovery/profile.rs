use super::{
    Candidate, DocumentContext, UniqueNodes, first_matching_selector, scoped_style_elements,
    select_all,
};
use crate::utils::{child_elements, selector, text_content};
use scraper::ElementRef;

/// Structural selectors for profile note containers, in order of confidence
const PROFILE_SELECTORS: [&str; 6] = [
    ".user-page .note-list .note-item",
    ".user-page .notes .note-item",
    ".profile-notes .note-item",
    ".profile-notes .feed-item",
    ".profile-notes .content",
    ".notes-container .note",
];

/// Classes tried together with a scoped-style attribute after the selectors
const SCOPED_STYLE_CLASSES: [&str; 2] = ["note-item", "note-card"];

/// Wrappers that may hold a note listing
const CONTAINER_SELECTOR: &str =
    "div[class*='note'], div[class*='post'], div[class*='feed'], div[class*='list']";

/// A listing container holds between this many anchors...
const MIN_CONTAINER_ANCHORS: usize = 3;

/// ...and this many; outside the range it is navigation chrome or a page wrapper
const MAX_CONTAINER_ANCHORS: usize = 100;

/// Minimum number of post-like children for a container to be accepted
const MIN_LISTING_POSTS: usize = 3;

/// Text longer than this (in characters) makes a linked element post-like
const MIN_POST_TEXT_LEN: usize = 10;

pub fn profile_selectors<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    if let Some(found) = first_matching_selector(ctx, &PROFILE_SELECTORS) {
        return Some(found);
    }

    SCOPED_STYLE_CLASSES.iter().find_map(|class| {
        let found = scoped_style_elements(ctx.doc, class);
        if found.is_empty() {
            return None;
        }
        ctx.sink.info(&format!(
            "Scoped-style class \"{}\" matched {} elements",
            class,
            found.len()
        ));
        Some(found.into_iter().map(Candidate::Node).collect())
    })
}

/// Scans listing-like containers for children that look like posts.
///
/// A child that is not post-like itself is looked through once, so posts
/// wrapped in a single extra layer are still found.
pub fn listing_containers<'a>(ctx: &DocumentContext<'a, '_>) -> Option<Vec<Candidate<'a>>> {
    let anchor = selector("a")?;

    let containers: Vec<ElementRef<'a>> = select_all(ctx.doc, CONTAINER_SELECTOR)
        .into_iter()
        .filter(|container| {
            let anchors = container.select(&anchor).count();
            (MIN_CONTAINER_ANCHORS..=MAX_CONTAINER_ANCHORS).contains(&anchors)
        })
        .collect();

    if containers.is_empty() {
        return None;
    }
    ctx.sink.debug(&format!(
        "Found {} possible listing containers",
        containers.len()
    ));

    for container in containers {
        let mut posts = UniqueNodes::default();
        for child in child_elements(&container) {
            if is_post_like(&child) {
                posts.push(child);
            } else {
                for grandchild in child_elements(&child) {
                    if is_post_like(&grandchild) {
                        posts.push(grandchild);
                    }
                }
            }
        }

        if posts.len() >= MIN_LISTING_POSTS {
            ctx.sink.info(&format!(
                "Container scan found {} possible notes",
                posts.len()
            ));
            return Some(posts.into_candidates());
        }
    }

    None
}

/// An element with a link and either an image or a bit of text
pub(crate) fn is_post_like(element: &ElementRef) -> bool {
    let (Some(anchor), Some(image)) = (selector("a"), selector("img")) else {
        return false;
    };

    if element.select(&anchor).next().is_none() {
        return false;
    }

    element.select(&image).next().is_some()
        || text_content(element).chars().count() > MIN_POST_TEXT_LEN
}
