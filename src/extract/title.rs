use crate::utils::{normalized_text, selector};
use scraper::ElementRef;

/// Title selector groups, most explicit first
const TITLE_SELECTORS: [&str; 3] = [
    ".title, .note-title, h1, h2, h3",
    "[class*=\"title\"], [class*=\"Title\"]",
    ".content p, .desc, .description",
];

/// Image alt text must be longer than this to count as a title
const MIN_ALT_LEN: usize = 5;

/// Own text content must be shorter than this to count as a title
const MAX_OWN_TEXT_LEN: usize = 100;

pub fn extract_title(article: &ElementRef) -> Option<String> {
    for css in TITLE_SELECTORS {
        let Some(sel) = selector(css) else {
            continue;
        };
        if let Some(title) = article
            .select(&sel)
            .map(|el| normalized_text(&el))
            .find(|text| !text.is_empty())
        {
            return Some(title);
        }
    }

    if let Some(alt) = selector("img")
        .and_then(|sel| article.select(&sel).next())
        .and_then(|img| img.value().attr("alt"))
        .map(str::trim)
    {
        if alt.chars().count() > MIN_ALT_LEN {
            return Some(alt.to_string());
        }
    }

    // A short card is likely just its title; a long one is a full card dump
    let text = normalized_text(article);
    let len = text.chars().count();
    if len > 0 && len < MAX_OWN_TEXT_LEN {
        return Some(text);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn title_of(html: &str) -> Option<String> {
        let doc = Html::parse_fragment(html);
        let card = doc.select(&selector("section").unwrap()).next().unwrap();
        extract_title(&card)
    }

    #[test]
    fn test_explicit_title_class() {
        let title = title_of(
            r#"<section><div class="title">  Weekend   hiking trip </div><p>desc</p></section>"#,
        );
        assert_eq!(title.as_deref(), Some("Weekend hiking trip"));
    }

    #[test]
    fn test_empty_title_falls_through() {
        let title = title_of(
            r#"<section><h2>   </h2><span class="footer-Title">Autumn recipes</span></section>"#,
        );
        assert_eq!(title.as_deref(), Some("Autumn recipes"));
    }

    #[test]
    fn test_description_fallback() {
        let title = title_of(r#"<section><div class="desc">Morning routine</div></section>"#);
        assert_eq!(title.as_deref(), Some("Morning routine"));
    }

    #[test]
    fn test_image_alt_fallback() {
        let long = "x".repeat(150);
        let html = format!(
            r#"<section><img alt="Sunset over the lake"><span>{}</span></section>"#,
            long
        );
        assert_eq!(title_of(&html).as_deref(), Some("Sunset over the lake"));
    }

    #[test]
    fn test_short_alt_is_ignored() {
        let title = title_of(r#"<section><img alt="pic"><span>Short card text</span></section>"#);
        assert_eq!(title.as_deref(), Some("Short card text"));
    }

    #[test]
    fn test_long_text_is_not_a_title() {
        let html = format!("<section><span>{}</span></section>", "word ".repeat(40));
        assert_eq!(title_of(&html), None);
    }

    #[test]
    fn test_empty_card() {
        assert_eq!(title_of("<section></section>"), None);
    }
}
