mod fetch;
mod parse;
mod types;

pub use fetch::fetch_feed;
pub use parse::parse_feed;
pub use types::{Enclosure, FeedItem};
