use ::scraper::error::SelectorErrorKind;
use std::num::ParseIntError;
use std::path::PathBuf;

/// All errors that can occur while scraping npb.jp or touching the record store.
#[derive(thiserror::Error, Debug)]
pub enum NpbError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// A text-extraction pattern could not be compiled.
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Failed to parse an integer from scraped text.
    #[error("failed to parse integer: {0}")]
    IntParse(#[from] ParseIntError),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// Reading or writing a record-store file failed.
    #[error("store i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl<'a> From<SelectorErrorKind<'a>> for NpbError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        NpbError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NpbError>;
