use anyhow::Result;
use clap::Parser;
use unidash::cli::{self, Cli};
use unidash::config::AppConfig;
use unidash::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = AppConfig::resolve(&cli.overrides(), |key| std::env::var(key).ok())?;

    logging::init(config.log_format);

    cli::run(cli.command, config).await
}
