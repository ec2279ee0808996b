use rssget_lib::cli::{parse_args, resolve_command, run};
use rssget_lib::error::RssGetError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), RssGetError> {
    color_eyre::install()?;

    let args = parse_args();
    let params = resolve_command(args.command)?;

    run(params).await;

    Ok(())
}
