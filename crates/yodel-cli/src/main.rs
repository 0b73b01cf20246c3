mod args;
mod commands;
mod prompt;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "yodel=warn,yodel_core=warn",
        1 => "yodel=info,yodel_core=info",
        2 => "yodel=debug,yodel_core=debug",
        _ => "yodel=trace,yodel_core=trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Some(Commands::Extract { url, options }) => {
            commands::extract::run(url.as_deref(), &options, cli.config.as_deref()).await
        }
        Some(Commands::Guess { title, url }) => {
            commands::guess::run(title.as_deref(), url.as_deref()).await
        }
        Some(Commands::Doctor) => commands::doctor::run(cli.config.as_deref()).await,
        Some(Commands::Config) => commands::config::run(cli.config.as_deref()).await,
        // Bare invocation: URL is optional and prompted for when missing
        None => commands::extract::run(cli.url.as_deref(), &cli.options, cli.config.as_deref()).await,
    }
}
