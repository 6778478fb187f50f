pub mod likes;
pub mod link;
pub mod title;

pub use likes::{extract_likes_raw, parse_like_count};
pub use link::extract_link;
pub use title::extract_title;

use crate::discovery::Candidate;
use crate::results::ExtractedRecord;

/// Raw fields pulled from one candidate; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub title: Option<String>,
    pub link: Option<String>,
    pub raw_likes_text: Option<String>,
}

impl Fields {
    /// Builds a record when every required field is present and the like
    /// counter parses
    pub fn into_record(self) -> Option<ExtractedRecord> {
        let like_count = parse_like_count(self.raw_likes_text.as_deref())?;
        match (self.title, self.link, self.raw_likes_text) {
            (Some(title), Some(link), Some(raw)) if !title.is_empty() && !link.is_empty() => {
                Some(ExtractedRecord::new(title, link, raw, like_count))
            }
            _ => None,
        }
    }
}

/// Pulls the raw fields out of a candidate.
///
/// Id-only candidates carry their link and nothing else; there is no
/// element to read a title or like counter from.
pub fn extract_fields(candidate: &Candidate) -> Fields {
    match candidate {
        Candidate::Node(element) => Fields {
            title: extract_title(element),
            link: extract_link(element),
            raw_likes_text: extract_likes_raw(element),
        },
        Candidate::Id(discovered) => Fields {
            link: Some(discovered.link.clone()),
            ..Fields::default()
        },
    }
}

pub fn extract_record(candidate: &Candidate) -> Option<ExtractedRecord> {
    extract_fields(candidate).into_record()
}
