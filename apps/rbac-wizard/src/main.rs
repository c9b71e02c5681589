mod cli;
mod config;
mod cors;
mod observability;
mod request_log;
mod server;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("{}", cli::version_info());
            Ok(())
        }
        Command::Serve { port } => {
            let config = AppConfig::load(cli.config.as_deref(), port)?;
            observability::init_logging(&config.logging);
            tracing::debug!(?config, "configuration loaded");

            server::run(config, server::shutdown_on(tokio::signal::ctrl_c())).await
        }
    }
}
