use crate::site::{SHORT_LINK_DOMAIN, SITE_DOMAIN, absolutize, canonical_link, is_post_address};
use crate::utils::{pattern, selector};
use scraper::ElementRef;

/// Data attributes that may carry a post id or address, in priority order
const DATA_ATTRIBUTES: [&str; 8] = [
    "data-note-id",
    "data-id",
    "data-itemid",
    "data-item-id",
    "data-link",
    "data-href",
    "data-url",
    "data-target",
];

/// Id patterns searched in serialized markup, most specific first
const ID_PATTERNS: [&str; 3] = [
    r"note/([a-zA-Z0-9]{6,})",
    r"explore/([a-zA-Z0-9]{6,})",
    r#"data-note-id=["']([a-zA-Z0-9]{6,})["']"#,
];

/// Resolves the canonical address of the post a candidate represents.
///
/// Steps run in order and the first hit wins: the element's own href,
/// descendant post anchors, data attributes, onclick handlers, id patterns
/// in the markup, then any absolute site URL in the markup.
pub fn extract_link(article: &ElementRef) -> Option<String> {
    own_href(article)
        .or_else(|| descendant_anchor(article))
        .or_else(|| data_attribute(article))
        .or_else(|| onclick_target(article))
        .or_else(|| {
            let html = article.html();
            markup_id(&html).or_else(|| markup_url(&html))
        })
}

fn own_href(article: &ElementRef) -> Option<String> {
    if article.value().name() != "a" {
        return None;
    }
    article.value().attr("href").and_then(absolutize)
}

fn descendant_anchor(article: &ElementRef) -> Option<String> {
    let sel = selector("a")?;
    article
        .select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| is_post_address(href))
        .and_then(absolutize)
}

fn data_attribute(article: &ElementRef) -> Option<String> {
    for name in DATA_ATTRIBUTES {
        let Some(value) = article.value().attr(name).map(str::trim) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if name.contains("id") && value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Some(canonical_link(value));
        }
        if value.starts_with("http") || value.starts_with('/') {
            return absolutize(value);
        }
    }
    None
}

fn onclick_target(article: &ElementRef) -> Option<String> {
    let onclick = article.value().attr("onclick")?;

    if let Some(id) = pattern(r#"['"]([a-zA-Z0-9]{6,})['"]"#)
        .and_then(|re| re.captures(onclick))
        .and_then(|caps| caps.get(1))
    {
        return Some(canonical_link(id.as_str()));
    }

    pattern(r#"(https?://[^'"]+)"#)
        .and_then(|re| re.captures(onclick))
        .and_then(|caps| caps.get(1))
        .and_then(|url| absolutize(url.as_str()))
}

fn markup_id(html: &str) -> Option<String> {
    ID_PATTERNS
        .iter()
        .filter_map(|re| pattern(re))
        .find_map(|re| re.captures(html).and_then(|caps| caps.get(1)))
        .map(|id| canonical_link(id.as_str()))
}

fn markup_url(html: &str) -> Option<String> {
    let re = pattern(r#"https?://[^\s"'<>]+"#)?;
    re.find_iter(html)
        .map(|m| m.as_str())
        .find(|url| url.contains(SITE_DOMAIN) || url.contains(SHORT_LINK_DOMAIN))
        .map(str::to_string)
}
