//! Per-task HTTP session: a fresh cookie jar and a client bound to it.

use crate::error::RssGetError;
use reqwest::cookie::Jar;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Maximum idle time between reads of a response body.
    pub read_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(120),
        }
    }
}

/// Cookie jar and client for one task. Never shared between tasks.
pub struct Session {
    client: reqwest::Client,
    feed_url: Url,
}

impl Session {
    /// Builds a session for `feed_url`, seeding its jar from a raw `Cookie`
    /// header value.
    pub fn new(feed_url: Url, cookies: &str, options: &HttpOptions) -> Result<Self, RssGetError> {
        let client = reqwest::Client::builder()
            .cookie_provider(cookie_jar(&feed_url, cookies))
            .user_agent(USER_AGENT)
            .connect_timeout(options.connect_timeout)
            .read_timeout(options.read_timeout)
            .build()?;

        Ok(Self { client, feed_url })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }
}

/// Cookies are scoped to the feed host with `Path=/`, so enclosures served
/// from the same host receive them too.
fn cookie_jar(feed_url: &Url, cookies: &str) -> Arc<Jar> {
    let jar = Arc::new(Jar::default());

    let pairs = parse_cookie_header(cookies);
    if !cookies.trim().is_empty() && pairs.is_empty() {
        warn!(url = %feed_url, "Cookie string contains no usable cookies");
    }
    for (name, value) in &pairs {
        jar.add_cookie_str(&format!("{}={}; Path=/", name, value), feed_url);
    }
    debug!(url = %feed_url, count = pairs.len(), "Seeded cookie jar");

    jar
}

/// Splits a `Cookie` request header value into `(name, value)` pairs.
///
/// Pairs without `=` or with a name that is not an HTTP token are dropped.
/// Surrounding double quotes are removed from values.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() || !name.chars().all(is_token_char) {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c)
}
