use super::parse::parse_feed;
use super::types::FeedItem;
use crate::error::RssGetError;
use crate::session::Session;

/// Downloads and parses the session's feed. Cookies from the session jar are
/// presented with the request.
pub async fn fetch_feed(session: &Session) -> Result<Vec<FeedItem>, RssGetError> {
    let url = session.feed_url();
    tracing::debug!(url = %url, "Fetching feed");

    let fetch_error = |reason: String| RssGetError::FeedFetch {
        url: url.to_string(),
        reason,
    };

    let response = session
        .client()
        .get(url.clone())
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("server returned HTTP {}", status)));
    }

    let content = response
        .bytes()
        .await
        .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?;

    parse_feed(&content, url)
}
