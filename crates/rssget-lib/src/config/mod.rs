mod loader;
mod model;
mod validate;

pub use loader::load_config;
pub use model::{Config, Task};
