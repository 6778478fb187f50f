//! Fixed facts about the host site: origin, path markers, link templates.

use url::Url;

/// Origin prefixed onto relative addresses
pub const ORIGIN: &str = "https://www.xiaohongshu.com";

/// Path segment identifying a post's canonical detail page
pub const LISTING_MARKER: &str = "/explore/";

/// Path segment identifying a single user's note listing
pub const PROFILE_MARKER: &str = "/user/profile/";

/// Short-link domain used in shared post links
pub const SHORT_LINK_DOMAIN: &str = "xhslink.com";

/// Site domain, accepted anywhere in a link
pub const SITE_DOMAIN: &str = "xiaohongshu.com";

/// Tokens that mark a text node as a like counter
pub const LIKE_MARKERS: [&str; 3] = ["赞", "like", "❤"];

/// Classification of the page being analyzed, derived once from its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageContext {
    pub is_user_profile_listing: bool,
}

impl PageContext {
    /// Classifies by path when the address parses, by raw substring otherwise
    pub fn from_url(address: &str) -> Self {
        let is_user_profile_listing = match Url::parse(address) {
            Ok(parsed) => parsed.path().contains(PROFILE_MARKER),
            Err(_) => address.contains(PROFILE_MARKER),
        };
        Self {
            is_user_profile_listing,
        }
    }
}

/// Builds the canonical detail link for a post id
pub fn canonical_link(id: &str) -> String {
    format!("{}{}{}", ORIGIN, LISTING_MARKER, id)
}

/// Resolves an address against the site origin the way a browser resolves
/// an anchor's href. Addresses that do not resolve are passed through as is.
pub fn absolutize(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = Url::parse(ORIGIN).and_then(|origin| origin.join(href));
    match resolved {
        Ok(url) => Some(url.into()),
        Err(_) => Some(href.to_string()),
    }
}

/// True when an address points at a post detail page or a share short link
pub fn is_post_address(href: &str) -> bool {
    href.contains(LISTING_MARKER) || href.contains(SHORT_LINK_DOMAIN)
}
