use crate::results::{ExtractedRecord, FilterResult};
use std::collections::HashSet;

/// Records left after link deduplication, plus how many were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduped {
    pub records: Vec<ExtractedRecord>,
    pub removed: usize,
}

/// Keeps records whose like count reaches the threshold (inclusive).
///
/// Discovery order is preserved in both `all_records` and `qualifying`.
pub fn filter_by_threshold(records: Vec<ExtractedRecord>, threshold: u64) -> FilterResult {
    let qualifying = qualifying(&records, threshold);
    FilterResult {
        all_records: records,
        qualifying,
        threshold,
    }
}

/// The subset of `records` with `like_count >= threshold`
pub fn qualifying(records: &[ExtractedRecord], threshold: u64) -> Vec<ExtractedRecord> {
    records
        .iter()
        .filter(|r| r.like_count >= threshold)
        .cloned()
        .collect()
}

/// Drops records whose link was already seen; the first occurrence wins
pub fn dedupe(records: Vec<ExtractedRecord>) -> Deduped {
    let total = records.len();
    let mut seen = HashSet::with_capacity(total);
    let records: Vec<ExtractedRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.link.clone()))
        .collect();

    Deduped {
        removed: total - records.len(),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(link: &str, like_count: u64) -> ExtractedRecord {
        ExtractedRecord::new(
            format!("title for {}", link),
            link.to_string(),
            like_count.to_string(),
            like_count,
        )
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let records = vec![record("a", 999), record("b", 1000), record("c", 1001)];
        let result = filter_by_threshold(records, 1000);

        assert_eq!(result.all_records.len(), 3);
        assert_eq!(result.threshold, 1000);
        let links: Vec<_> = result.qualifying.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["b", "c"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = vec![
            record("a", 5),
            record("b", 5000),
            record("c", 20),
            record("d", 12000),
        ];
        let once = qualifying(&records, 1000);
        let twice = qualifying(&once, 1000);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![record("z", 3000), record("a", 2000), record("m", 4000)];
        let result = filter_by_threshold(records, 0);
        let links: Vec<_> = result.qualifying.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_dedupe_first_occurrence_wins() {
        let mut first = record("a", 1);
        first.title = "first".to_string();
        let mut later = record("a", 2);
        later.title = "later".to_string();

        let result = dedupe(vec![first, record("b", 1), later]);

        assert_eq!(result.removed, 1);
        let links: Vec<_> = result.records.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["a", "b"]);
        assert_eq!(result.records[0].title, "first");
    }

    #[test]
    fn test_dedupe_empty() {
        let result = dedupe(Vec::new());
        assert!(result.records.is_empty());
        assert_eq!(result.removed, 0);
    }
}
