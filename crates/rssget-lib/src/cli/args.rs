use clap::{ArgAction, Parser};
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub config_path: String,
    pub parallelism: usize,
    pub timeout_secs: u64,
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "rssget",
    version,
    about = "Download enclosures of RSS items matching configured shows and quality"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to config file",
        default_value = ".gorssget.yaml"
    )]
    config: String,

    #[arg(
        short = 'j',
        long = "parallelism",
        value_name = "N",
        help = "Number of tasks to run at the same time",
        default_value_t = 1
    )]
    parallelism: usize,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help = "Abort a request when the server sends nothing for this long",
        default_value_t = 120
    )]
    timeout: u64,
}

fn args_from_cli(cli: Cli) -> Args {
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    Args {
        command: Command {
            config_path: cli.config,
            parallelism: cli.parallelism,
            timeout_secs: cli.timeout,
        },
        log_level,
    }
}

/// Parses arguments from an explicit iterator without touching logging.
pub fn try_parse_args_from<I, T>(iter: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter).map(args_from_cli)
}

pub fn parse_args() -> Args {
    let args = args_from_cli(Cli::parse());

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(args.log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=warn".parse().expect("valid directive")),
        )
        .init();

    args
}
