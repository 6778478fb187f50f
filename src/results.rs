use serde::{Deserialize, Serialize};

/// A post extracted from the page with every required field present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Post title (non-empty)
    pub title: String,

    /// Absolute address of the post; used as the deduplication key
    pub link: String,

    /// Like counter text as it appeared on the page, e.g. "1.2万"
    pub raw_likes_text: String,

    /// Normalized like count
    pub like_count: u64,
}

impl ExtractedRecord {
    pub fn new(title: String, link: String, raw_likes_text: String, like_count: u64) -> Self {
        Self {
            title,
            link,
            raw_likes_text,
            like_count,
        }
    }
}

/// Outcome of applying a like threshold to the extracted records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    /// Every extracted record, in discovery order
    pub all_records: Vec<ExtractedRecord>,

    /// Records with `like_count >= threshold`, in discovery order
    pub qualifying: Vec<ExtractedRecord>,

    pub threshold: u64,
}
