use crate::config::SettleConfig;
use crate::error::Result;
use crate::site::PageContext;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::path::PathBuf;

/// Something that can produce the serialized markup of a rendered page
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn render(&mut self, url: &str, page: PageContext) -> Result<String>;
}

/// Common local WebDriver endpoints tried when the configured one is down
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Renders pages in a real browser driven over WebDriver
pub struct WebDriverPage {
    client: Client,
    settle: SettleConfig,
}

impl WebDriverPage {
    /// Connects to the WebDriver instance, falling back to common local ports
    pub async fn connect(webdriver_url: &str, settle: SettleConfig) -> Result<Self> {
        let client = match ClientBuilder::native().connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                client
            }
            Err(e) => {
                ::log::warn!(
                    "Failed to connect to WebDriver at {}: {}",
                    webdriver_url,
                    e
                );
                connect_fallback(webdriver_url).await.ok_or(e)?
            }
        };

        Ok(Self { client, settle })
    }

    /// Ends the browser session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    /// Scrolls down the page in equal steps to trigger lazy loading.
    /// Best effort: there is no signal that new content finished loading.
    async fn scroll_listing(&self) -> Result<()> {
        let height = self
            .client
            .execute("return document.body.clientHeight;", vec![])
            .await?
            .as_f64()
            .unwrap_or(0.0);

        let steps = self.settle.scroll_steps.max(1);
        let step = height / f64::from(steps);
        for i in 1..=steps {
            self.client
                .execute(
                    "window.scrollTo(0, arguments[0]);",
                    vec![json!(step * f64::from(i))],
                )
                .await?;
            tokio::time::sleep(self.settle.scroll_interval()).await;
        }
        ::log::debug!("Scrolled listing in {} steps of {:.0}px", steps, step);
        Ok(())
    }
}

impl PageSource for WebDriverPage {
    async fn render(&mut self, url: &str, page: PageContext) -> Result<String> {
        ::log::info!("Opening {}", url);
        self.client.goto(url).await?;

        if page.is_user_profile_listing {
            ::log::info!("User profile listing detected, waiting for content to load");
            tokio::time::sleep(self.settle.profile_delay()).await;
            self.scroll_listing().await?;
        } else {
            tokio::time::sleep(self.settle.feed_delay()).await;
        }

        let html = self.client.source().await?;
        ::log::debug!("Rendered page is {} bytes", html.len());
        Ok(html)
    }
}

async fn connect_fallback(tried: &str) -> Option<Client> {
    for url in FALLBACK_WEBDRIVER_URLS {
        if url == tried {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}

/// A page saved to disk, read instead of driving a browser
#[derive(Debug, Clone)]
pub struct HtmlFile {
    path: PathBuf,
}

impl HtmlFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for HtmlFile {
    async fn render(&mut self, _url: &str, _page: PageContext) -> Result<String> {
        ::log::info!("Reading saved page {}", self.path.display());
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_html_file_source() {
        let path = std::env::temp_dir().join(format!("note-harvest-{}.html", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"<html><body><div class=\"note-item\"></div></body></html>")
            .unwrap();

        let mut source = HtmlFile::new(&path);
        let html = source
            .render("https://www.xiaohongshu.com/explore", PageContext::default())
            .await
            .unwrap();
        assert!(html.contains("note-item"));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_html_file() {
        let mut source = HtmlFile::new("/nonexistent/page.html");
        let result = source
            .render("https://www.xiaohongshu.com/explore", PageContext::default())
            .await;
        assert!(matches!(result, Err(crate::error::HarvestError::Io(_))));
    }
}
