mod api;
mod cli;
mod router;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn load_config() -> lexis_core::Config {
    lexis_core::config::load_dotenv();
    lexis_core::Config::from_env()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::CliArgs::parse();

    // .env must be loaded before the filter reads RUST_LOG.
    let config = load_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    cli::dispatch(config, args).await
}
