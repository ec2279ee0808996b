mod args;
mod params;
mod resolved_command;
mod run;

pub use args::{Args, Command, parse_args, try_parse_args_from};
pub use params::RunParams;
pub use resolved_command::resolve_command;
pub use run::run;
