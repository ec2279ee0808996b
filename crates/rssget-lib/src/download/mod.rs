mod content_disposition;
#[allow(clippy::module_inception)]
mod download;
mod types;

pub use content_disposition::{base_file_name, parse_content_disposition};
pub use download::{download_enclosure, download_item};
pub use types::EnclosureOutcome;
