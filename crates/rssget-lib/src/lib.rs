pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod feed;
pub mod matcher;
pub mod runner;
pub mod session;

pub use config::Config;
pub use error::RssGetError;
