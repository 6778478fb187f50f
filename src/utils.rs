use regex::Regex;
use scraper::{ElementRef, Selector};

/// Compiles a CSS selector, logging and skipping patterns the parser rejects
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            ::log::warn!("Skipping invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// Compiles a regex, logging and skipping patterns that fail to compile
pub fn pattern(re: &str) -> Option<Regex> {
    match Regex::new(re) {
        Ok(regex) => Some(regex),
        Err(e) => {
            ::log::warn!("Skipping invalid pattern {:?}: {}", re, e);
            None
        }
    }
}

/// Concatenated text content of an element, trimmed
pub fn text_content(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text content with runs of whitespace collapsed to single spaces
pub fn normalized_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if the string contains an ASCII digit
pub fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Parent element, skipping the document node
pub fn parent_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Direct element children
pub fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_invalid_selector_is_skipped() {
        assert!(selector("div.note-item").is_some());
        assert!(selector("div[").is_none());
    }

    #[test]
    fn test_text_helpers() {
        let doc = Html::parse_fragment("<div>  Hello \n   <b>world</b>  </div>");
        let div = doc.select(&selector("div").unwrap()).next().unwrap();
        assert_eq!(text_content(&div), "Hello \n   world");
        assert_eq!(normalized_text(&div), "Hello world");
    }

    #[test]
    fn test_has_digit() {
        assert!(has_digit("1.2万"));
        assert!(!has_digit("赞"));
    }
}
