use crate::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Minimum like count for a post to qualify
    #[serde(default = "default_like_threshold")]
    pub like_threshold: u64,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Delays that let the page finish rendering before discovery
    #[serde(default)]
    pub settle: SettleConfig,

    /// Remote table that qualifying posts are uploaded to
    #[serde(default)]
    pub store: StoreConfig,
}

/// Page settle timings.
///
/// Scrolling only nudges lazy loading; nothing checks that new posts
/// actually arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Wait before discovery on feed pages, in milliseconds
    #[serde(default = "default_feed_delay_ms")]
    pub feed_delay_ms: u64,

    /// Wait before scrolling on profile listings, in milliseconds
    #[serde(default = "default_profile_delay_ms")]
    pub profile_delay_ms: u64,

    /// Number of scroll steps on profile listings
    #[serde(default = "default_scroll_steps")]
    pub scroll_steps: u32,

    /// Wait after each scroll step, in milliseconds
    #[serde(default = "default_scroll_interval_ms")]
    pub scroll_interval_ms: u64,
}

/// Credentials and layout of the remote table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub app_secret: String,

    /// Id of the base (app) holding the table
    #[serde(default)]
    pub base_id: String,

    #[serde(default)]
    pub table_id: String,

    /// Open API origin
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Column names in the target table
    #[serde(default)]
    pub fields: FieldNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_title_field")]
    pub title: String,

    #[serde(default = "default_link_field")]
    pub link: String,

    #[serde(default = "default_likes_field")]
    pub likes: String,
}

/// Validated, non-blank store credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub app_id: &'a str,
    pub app_secret: &'a str,
    pub base_id: &'a str,
    pub table_id: &'a str,
}

impl HarvestConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Applies overrides from the environment (`WEBDRIVER_URL`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            like_threshold: default_like_threshold(),
            webdriver_url: default_webdriver_url(),
            settle: SettleConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl SettleConfig {
    pub fn feed_delay(&self) -> Duration {
        Duration::from_millis(self.feed_delay_ms)
    }

    pub fn profile_delay(&self) -> Duration {
        Duration::from_millis(self.profile_delay_ms)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            feed_delay_ms: default_feed_delay_ms(),
            profile_delay_ms: default_profile_delay_ms(),
            scroll_steps: default_scroll_steps(),
            scroll_interval_ms: default_scroll_interval_ms(),
        }
    }
}

impl StoreConfig {
    /// Returns the credentials, or names every blank one
    pub fn credentials(&self) -> Result<Credentials<'_>> {
        let required = [
            ("app_id", self.app_id.trim()),
            ("app_secret", self.app_secret.trim()),
            ("base_id", self.base_id.trim()),
            ("table_id", self.table_id.trim()),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(HarvestError::IncompleteCredentials(missing.join(", ")));
        }

        Ok(Credentials {
            app_id: required[0].1,
            app_secret: required[1].1,
            base_id: required[2].1,
            table_id: required[3].1,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            base_id: String::new(),
            table_id: String::new(),
            api_base: default_api_base(),
            fields: FieldNames::default(),
        }
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            title: default_title_field(),
            link: default_link_field(),
            likes: default_likes_field(),
        }
    }
}

/// Default like threshold
fn default_like_threshold() -> u64 {
    1000
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_feed_delay_ms() -> u64 {
    2000
}

fn default_profile_delay_ms() -> u64 {
    5000
}

fn default_scroll_steps() -> u32 {
    5
}

fn default_scroll_interval_ms() -> u64 {
    1000
}

fn default_api_base() -> String {
    "https://open.feishu.cn".to_string()
}

fn default_title_field() -> String {
    "标题".to_string()
}

fn default_link_field() -> String {
    "链接".to_string()
}

fn default_likes_field() -> String {
    "点赞数".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = HarvestConfig::from_json("{}").unwrap();
        assert_eq!(config.like_threshold, 1000);
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.settle.scroll_steps, 5);
        assert_eq!(config.settle.profile_delay(), Duration::from_secs(5));
        assert_eq!(config.settle.feed_delay(), Duration::from_secs(2));
        assert_eq!(config.store.api_base, "https://open.feishu.cn");
        assert_eq!(config.store.fields.likes, "点赞数");
    }

    #[test]
    fn test_partial_json() {
        let config = HarvestConfig::from_json(
            r#"{
                "like_threshold": 500,
                "store": { "app_id": "cli_a1", "fields": { "title": "Title" } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.like_threshold, 500);
        assert_eq!(config.store.app_id, "cli_a1");
        assert_eq!(config.store.fields.title, "Title");
        assert_eq!(config.store.fields.link, "链接");
    }

    #[test]
    fn test_invalid_json() {
        let err = HarvestConfig::from_json("{ like_threshold: }").unwrap_err();
        assert!(matches!(err, HarvestError::Config(_)));
    }

    #[test]
    fn test_incomplete_credentials() {
        let store = StoreConfig {
            app_id: "cli_a1".to_string(),
            app_secret: "  ".to_string(),
            ..StoreConfig::default()
        };

        match store.credentials() {
            Err(HarvestError::IncompleteCredentials(missing)) => {
                assert_eq!(missing, "app_secret, base_id, table_id");
            }
            other => panic!("expected incomplete credentials, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_credentials() {
        let store = StoreConfig {
            app_id: "cli_a1".to_string(),
            app_secret: "secret".to_string(),
            base_id: "bascn1".to_string(),
            table_id: "tbl1".to_string(),
            ..StoreConfig::default()
        };

        let credentials = store.credentials().unwrap();
        assert_eq!(credentials.base_id, "bascn1");
        assert_eq!(credentials.table_id, "tbl1");
    }
}
