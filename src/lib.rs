// Re-export modules
pub mod browser;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod filter;
pub mod pipeline;
pub mod results;
pub mod site;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use diagnostics::{Diagnostics, LogBuffer, LogSink};
pub use error::{HarvestError, Result};
pub use pipeline::{Analysis, RunStatus, analyze_html};
pub use results::{ExtractedRecord, FilterResult};
pub use site::PageContext;

use browser::{HtmlFile, PageSource, WebDriverPage};
use config::HarvestConfig;
use std::path::PathBuf;
use store::BitableClient;

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct Report {
    pub analysis: Analysis,
    pub status: RunStatus,
}

/// Main builder for analyzing a post listing page
pub struct Harvest {
    url: String,
    config: HarvestConfig,
    threshold: Option<u64>,
    html_file: Option<PathBuf>,
    upload: bool,
}

impl Harvest {
    /// Create a new builder for the page at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            config: HarvestConfig::default(),
            threshold: None,
            html_file: None,
            upload: false,
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Override the configured like threshold
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Analyze a saved copy of the page instead of driving a browser
    pub fn with_html_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.html_file = Some(path.into());
        self
    }

    /// Upload qualifying posts to the configured remote table
    pub fn with_upload(mut self, upload: bool) -> Self {
        self.upload = upload;
        self
    }

    pub fn threshold(&self) -> u64 {
        self.threshold.unwrap_or(self.config.like_threshold)
    }

    pub fn page_context(&self) -> PageContext {
        PageContext::from_url(&self.url)
    }

    /// Render the page, analyze it and optionally upload the qualifying posts
    pub async fn run(self, sink: &dyn Diagnostics) -> Result<Report> {
        let config = self.config.clone().with_env_overrides();
        let threshold = self.threshold();
        let page = self.page_context();

        // Check credentials before spending time on the page
        let store = if self.upload {
            Some(BitableClient::new(config.store.clone())?)
        } else {
            None
        };

        sink.info(&format!(
            "Analyzing {} with a like threshold of {}",
            self.url, threshold
        ));

        let html = match &self.html_file {
            Some(path) => HtmlFile::new(path).render(&self.url, page).await?,
            None => {
                let mut browser =
                    WebDriverPage::connect(&config.webdriver_url, config.settle.clone()).await?;
                let rendered = browser.render(&self.url, page).await;
                if let Err(e) = browser.close().await {
                    ::log::warn!("Failed to close browser session: {}", e);
                }
                rendered?
            }
        };

        let analysis = analyze_html(&html, page, threshold, sink);
        let status = match &store {
            Some(store) => pipeline::upload(store, &analysis, sink).await,
            None => analysis.status(),
        };

        Ok(Report { analysis, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_override() {
        let harvest = Harvest::new("https://www.xiaohongshu.com/explore");
        assert_eq!(harvest.threshold(), 1000);

        let harvest = harvest.with_threshold(250);
        assert_eq!(harvest.threshold(), 250);
    }

    #[test]
    fn test_page_context_from_url() {
        let harvest = Harvest::new("https://www.xiaohongshu.com/user/profile/5f1a2b3c");
        assert!(harvest.page_context().is_user_profile_listing);
    }

    #[tokio::test]
    async fn test_upload_requires_credentials() {
        let sink = LogBuffer::new();
        let result = Harvest::new("https://www.xiaohongshu.com/explore")
            .with_html_file("/nonexistent/page.html")
            .with_upload(true)
            .run(&sink)
            .await;

        assert!(matches!(result, Err(HarvestError::IncompleteCredentials(_))));
    }

    #[tokio::test]
    async fn test_run_from_saved_page() {
        let path = std::env::temp_dir().join(format!("note-harvest-run-{}.html", std::process::id()));
        std::fs::write(
            &path,
            r#"<html><body>
                <section class="note-item">
                    <a href="/explore/64aa01bb02"><img src="a.jpg"></a>
                    <div class="title">Hidden beaches</div>
                    <span class="like-count">2.1万</span>
                </section>
                <section class="note-item">
                    <a href="/explore/64aa01bb03"><img src="b.jpg"></a>
                    <div class="title">Tea houses</div>
                    <span class="like-count">310</span>
                </section>
            </body></html>"#,
        )
        .unwrap();

        let sink = LogBuffer::new();
        let report = Harvest::new("https://www.xiaohongshu.com/explore")
            .with_html_file(&path)
            .run(&sink)
            .await
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(report.analysis.result.all_records.len(), 2);
        assert_eq!(report.status, RunStatus::Analyzed { qualifying: 1 });
        assert_eq!(report.analysis.result.qualifying[0].like_count, 21000);
    }
}
