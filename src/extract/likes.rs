use crate::site::LIKE_MARKERS;
use crate::utils::{has_digit, selector, text_content};
use scraper::ElementRef;

/// Selector groups tried in order when looking for the like counter
const LIKE_SELECTORS: [&str; 2] = [
    ".like-count, .likes, .like-num, [class*=\"like\"]",
    ".interactions span, .count span, .statistics span",
];

/// Unit markers scaling the number by ten thousand
const TEN_THOUSAND_MARKERS: [char; 3] = ['万', 'w', 'W'];

/// Unit markers scaling the number by one thousand
const THOUSAND_MARKERS: [char; 2] = ['k', 'K'];

/// Finds the raw like counter text inside a candidate.
///
/// Counter-ish elements are checked first, then generic statistics
/// containers, then every text node that mentions a like marker.
pub fn extract_likes_raw(article: &ElementRef) -> Option<String> {
    for css in LIKE_SELECTORS {
        let Some(sel) = selector(css) else {
            continue;
        };
        for element in article.select(&sel) {
            let text = text_content(&element);
            if has_digit(&text) {
                return Some(text);
            }
        }
    }

    article
        .descendants()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .find(|text| has_digit(text) && LIKE_MARKERS.iter().any(|m| text.contains(m)))
        .map(str::to_string)
}

/// Normalizes a like counter such as "1.2万", "3.4w" or "2.5k" to an integer.
///
/// Everything but digits and decimal points is stripped before parsing, so
/// unit markers are detected on the original text.
pub fn parse_like_count(raw: Option<&str>) -> Option<u64> {
    let raw = raw?;

    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }

    let mut count = leading_number(&digits)?;

    if raw.contains(TEN_THOUSAND_MARKERS) {
        count *= 10_000.0;
    } else if raw.contains(THOUSAND_MARKERS) {
        count *= 1_000.0;
    }

    Some(count.round() as u64)
}

/// Parses the longest `digits[.digits]` prefix, so "1.2.3" reads as 1.2
fn leading_number(digits: &str) -> Option<f64> {
    let end = digits
        .match_indices('.')
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<f64>().ok()
}
