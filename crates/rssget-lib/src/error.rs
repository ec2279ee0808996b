use thiserror::Error;

#[derive(Error, Debug)]
pub enum RssGetError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation failed for task {task}: {details}")]
    ConfigValidation { task: String, details: String },

    #[error("Invalid command line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch feed {url}: {reason}")]
    FeedFetch { url: String, reason: String },

    #[error("Failed to parse feed {url}: {reason}")]
    FeedParse { url: String, reason: String },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}
