use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Task {
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    /// Feed URL
    #[serde(rename = "Rss", alias = "rss")]
    pub rss: String,
    /// Raw `Cookie` header value presented to the feed host
    #[serde(rename = "Cookies", alias = "cookies", default)]
    pub cookies: String,
    #[serde(rename = "Quality", alias = "quality", default)]
    pub quality: String,
    /// Destination directory for downloaded enclosures
    #[serde(rename = "Download", alias = "download")]
    pub download: PathBuf,
    #[serde(rename = "Shows", alias = "shows", default)]
    pub shows: Vec<String>,
    #[serde(
        rename = "IgnoreCase",
        alias = "ignorecase",
        alias = "ignore_case",
        default
    )]
    pub ignore_case: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database path. Carried through for compatibility, nothing reads it.
    #[serde(rename = "DB", alias = "db", default)]
    pub db: Option<String>,
    #[serde(rename = "Tasks", alias = "tasks", default)]
    pub tasks: HashMap<String, Task>,
}
