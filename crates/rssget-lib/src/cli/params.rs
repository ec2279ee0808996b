use crate::config::Config;
use crate::runner::RunOptions;

#[derive(Debug, Clone)]
pub struct RunParams {
    pub app_config: Config,
    pub options: RunOptions,
}
