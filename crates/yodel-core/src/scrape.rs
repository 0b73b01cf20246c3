//! Page title lookup from a video's HTML page

use crate::error::ScrapeError;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("yodel/", env!("CARGO_PKG_VERSION"));

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("valid selector"));

pub fn http_client() -> Result<reqwest::Client, ScrapeError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// Fetch `url` and return its `og:title`. `Ok(None)` when the page has no
/// such meta element or it carries no content.
pub async fn fetch_page_title(
    client: &reqwest::Client,
    url: &str,
) -> Result<Option<String>, ScrapeError> {
    debug!(url = %url, "Fetching page title");

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    let title = extract_page_title(&body);
    if title.is_none() {
        debug!("No og:title on {}", url);
    }
    Ok(title)
}

/// Content of the first `meta[property="og:title"]` in an HTML document.
pub fn extract_page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&OG_TITLE)
        .next()?
        .value()
        .attr("content")
        .map(str::to_string)
}
