//! WFD CLI - replay, ingest and export weather forecast deliveries.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wfd-cli",
    version,
    about = "Weather forecast dashboard pipeline toolkit",
    long_about = "Push Open-Meteo style forecast deliveries through the widget runtime.\n\
                  `replay` and `ingest` print a dashboard snapshot as JSON; \
                  `export` writes one CSV row per forecast day.\n\
                  Set RUST_LOG=info to follow the pipeline."
)]
struct Cli {
    #[command(subcommand)]
    command: wfd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let name = cli.command.name();
    log::info!("[WFD] cli: running {}", name);
    if let Err(e) = wfd_cmd::run(cli.command).await {
        log::error!("[WFD] cli: {} failed: {:#}", name, e);
        return Err(e);
    }
    Ok(())
}
