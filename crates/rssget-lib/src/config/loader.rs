use super::Config;
use crate::error::RssGetError;
use config::{Config as ConfigBuilder, FileFormat};

/// Loads the task configuration from a YAML (or JSON) document and validates it.
pub fn load_config(config_path: &str) -> Result<Config, RssGetError> {
    let config_builder = ConfigBuilder::builder()
        .add_source(config::File::new(config_path, FileFormat::Yaml))
        .build()?;

    let config: Config = config_builder.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
