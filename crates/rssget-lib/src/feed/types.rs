#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enclosure {
    /// As written in the feed; may be relative to the feed URL
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub enclosures: Vec<Enclosure>,
}
