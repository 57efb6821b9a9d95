pub(crate) mod box_score;
pub(crate) mod players;
pub(crate) mod schedule;

use ::scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{NpbError, Result};

pub(crate) const BASE_URL: &str = "https://npb.jp";

/// Fetch a URL and parse the response body as an HTML document.
pub(crate) async fn get_document(client: &reqwest::Client, url: &str) -> Result<Html> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| NpbError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(NpbError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().await.map_err(|e| NpbError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;

    Ok(Html::parse_document(&body))
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .and_then(|d| d.text().map(|t| t.trim()).find(|t| !t.is_empty()))
        .unwrap_or_default()
        .trim()
        .replace(['\n', '\t'], "")
        .to_string()
}

/// Concatenated trimmed text of every text node under `element`.
pub(crate) fn cell_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// Parse a count cell; non-numeric text yields `None`.
pub(crate) fn parse_count(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

/// Normalize a site-relative path to an absolute npb.jp URL.
pub(crate) fn absolutize_url(href: &str) -> String {
    if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("{BASE_URL}{href}")
    } else {
        href.to_string()
    }
}
