use thiserror::Error;

/// Errors surfaced to the caller of a harvest run.
///
/// Missing fields and empty selector matches are not errors; they are
/// represented as `None` throughout discovery and extraction.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// One or more of app id, app secret, base id, table id is blank
    #[error("store credentials are incomplete (missing: {0})")]
    IncompleteCredentials(String),

    /// The token endpoint answered without a tenant access token
    #[error("failed to obtain store access token: {0}")]
    Token(String),

    /// The batch insert endpoint answered with a non-zero code
    #[error("store rejected batch insert (code {code}): {message}")]
    Store { code: i64, message: String },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not start a WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
