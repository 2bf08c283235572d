//! CLI for pollsub
//!
//! Loads `.env`, configuration and logging, then serves the broker over HTTP
//! until ctrl-c.

use std::sync::Arc;

use clap::Parser;
use pollsub::broker::{Broker, RetentionPolicy};
use pollsub::config::{Settings, load_config, load_config_from};
use pollsub::transport::start_http_server;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pollsub", about = "HTTP publish/subscribe broker with polling delivery")]
struct Cli {
    /// Configuration file to read instead of `config/default`
    #[arg(long)]
    config: Option<String>,

    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port
    #[arg(long)]
    port: Option<u16>,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            pollsub::utils::logging::init("info");
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    pollsub::utils::logging::init(&settings.server.log_level);

    if let Err(e) = run_server(settings).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, config::ConfigError> {
    let mut settings = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(host) = &cli.host {
        settings.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(level) = &cli.log_level {
        settings.server.log_level = level.clone();
    }
    Ok(settings)
}

async fn run_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let broker = Arc::new(Broker::with_retention(RetentionPolicy::from(
        &settings.broker,
    )));
    let retention = broker.retention();
    info!(
        "buffer retention: max {:?} messages, ttl {:?}",
        retention.max_messages, retention.ttl
    );
    let addr = settings.bind_addr();

    tokio::select! {
        result = start_http_server(&addr, broker) => {
            result?;
            error!("HTTP server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}
