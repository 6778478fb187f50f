use crate::diagnostics::Diagnostics;
use crate::discovery::{Candidate, discover};
use crate::extract::extract_fields;
use crate::filter::filter_by_threshold;
use crate::results::FilterResult;
use crate::site::PageContext;
use crate::store::{TabularStore, submit};
use scraper::Html;
use std::fmt;

/// Result of analyzing one rendered page
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Number of candidate elements discovery produced
    pub candidates: usize,

    /// Strategy that produced the candidates, if any did
    pub strategy: Option<&'static str>,

    /// Candidates dropped because a required field was missing
    pub dropped: usize,

    pub result: FilterResult,
}

/// Operator-facing outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// No post could be parsed from the page
    NothingParsed,
    /// Posts were parsed but none reached the threshold
    NothingQualified { threshold: u64 },
    /// Posts qualified; no upload was requested
    Analyzed { qualifying: usize },
    Uploaded {
        inserted: usize,
        duplicates_removed: usize,
    },
    UploadFailed { message: String },
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::NothingParsed => {
                write!(f, "No posts could be parsed from the page")
            }
            RunStatus::NothingQualified { threshold } => {
                write!(f, "No posts with at least {} likes", threshold)
            }
            RunStatus::Analyzed { qualifying } => {
                write!(f, "Found {} qualifying posts", qualifying)
            }
            RunStatus::Uploaded {
                inserted,
                duplicates_removed,
            } => {
                write!(f, "Saved {} posts to the remote table", inserted)?;
                if *duplicates_removed > 0 {
                    write!(f, " ({} duplicates skipped)", duplicates_removed)?;
                }
                Ok(())
            }
            RunStatus::UploadFailed { message } => {
                write!(f, "Upload to the remote table failed: {}", message)
            }
        }
    }
}

impl RunStatus {
    /// True for outcomes the operator should treat as a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::NothingParsed | RunStatus::UploadFailed { .. }
        )
    }
}

impl Analysis {
    /// Status before any upload is attempted
    pub fn status(&self) -> RunStatus {
        if self.result.all_records.is_empty() {
            RunStatus::NothingParsed
        } else if self.result.qualifying.is_empty() {
            RunStatus::NothingQualified {
                threshold: self.result.threshold,
            }
        } else {
            RunStatus::Analyzed {
                qualifying: self.result.qualifying.len(),
            }
        }
    }
}

/// Discovers posts in `html`, extracts their fields and applies the threshold
pub fn analyze_html(
    html: &str,
    page: PageContext,
    threshold: u64,
    sink: &dyn Diagnostics,
) -> Analysis {
    let doc = Html::parse_document(html);
    let discovery = discover(&doc, page, sink);
    if discovery.is_empty() {
        return Analysis {
            result: filter_by_threshold(Vec::new(), threshold),
            ..Analysis::default()
        };
    }

    let mut records = Vec::with_capacity(discovery.candidates.len());
    let mut dropped = 0;
    for (index, candidate) in discovery.candidates.iter().enumerate() {
        match extract_fields(candidate).into_record() {
            Some(record) => records.push(record),
            None => {
                dropped += 1;
                if let Candidate::Id(discovered) = candidate {
                    sink.debug(&format!(
                        "Note {} has no like count on the page, skipping",
                        discovered.id
                    ));
                } else {
                    sink.debug(&format!("Candidate {} is missing a field, skipping", index));
                }
            }
        }
    }
    sink.info(&format!("Parsed {} posts", records.len()));

    let result = filter_by_threshold(records, threshold);
    sink.info(&format!(
        "{} posts have at least {} likes",
        result.qualifying.len(),
        threshold
    ));

    Analysis {
        candidates: discovery.candidates.len(),
        strategy: discovery.strategy,
        dropped,
        result,
    }
}

/// Uploads the qualifying posts of an analysis and reports the outcome.
/// Store errors become [`RunStatus::UploadFailed`] rather than propagating.
pub async fn upload<S: TabularStore>(
    store: &S,
    analysis: &Analysis,
    sink: &dyn Diagnostics,
) -> RunStatus {
    let status = analysis.status();
    if !matches!(status, RunStatus::Analyzed { .. }) {
        return status;
    }

    match submit(store, analysis.result.qualifying.clone(), sink).await {
        Ok(submission) => RunStatus::Uploaded {
            inserted: submission.inserted,
            duplicates_removed: submission.duplicates_removed,
        },
        Err(e) => {
            sink.log(log::Level::Error, &format!("Upload failed: {}", e));
            RunStatus::UploadFailed {
                message: e.to_string(),
            }
        }
    }
}
