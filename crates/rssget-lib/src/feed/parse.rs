use super::types::{Enclosure, FeedItem};
use crate::error::RssGetError;
use feed_rs::model::Entry;
use feed_rs::parser;
use url::Url;

/// Parses an RSS, Atom or JSON Feed document fetched from `feed_url`.
///
/// Relative enclosure URLs are resolved against `feed_url`.
pub fn parse_feed(content: &[u8], feed_url: &Url) -> Result<Vec<FeedItem>, RssGetError> {
    let feed = parser::Builder::new()
        .base_uri(Some(feed_url.as_str()))
        .build()
        .parse(content)
        .map_err(|e| RssGetError::FeedParse {
            url: feed_url.to_string(),
            reason: e.to_string(),
        })?;

    tracing::debug!(url = %feed_url, feed_type = ?feed.feed_type, "Parsed feed, found {} items", feed.entries.len());

    Ok(feed
        .entries
        .iter()
        .map(|entry| FeedItem {
            title: entry
                .title
                .as_ref()
                .map(|t| t.content.clone())
                .unwrap_or_default(),
            enclosures: entry_enclosures(entry),
        })
        .collect())
}

/// RSS `<enclosure>` elements and JSON Feed attachments arrive as media
/// content, Atom enclosures as `rel="enclosure"` links. Document order is
/// kept and repeated URLs are dropped.
fn entry_enclosures(entry: &Entry) -> Vec<Enclosure> {
    let media = entry
        .media
        .iter()
        .flat_map(|media| media.content.iter())
        .filter_map(|content| content.url.as_ref().map(Url::to_string));

    let links = entry
        .links
        .iter()
        .filter(|link| {
            link.rel
                .as_deref()
                .is_some_and(|rel| rel.eq_ignore_ascii_case("enclosure"))
        })
        .map(|link| link.href.trim().to_string());

    let mut enclosures: Vec<Enclosure> = Vec::new();
    for url in media.chain(links) {
        if url.is_empty() || enclosures.iter().any(|e| e.url == url) {
            continue;
        }
        enclosures.push(Enclosure { url });
    }
    enclosures
}
