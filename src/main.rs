use anyhow::Result;
use claude_relay::{config, server};
use tracing::info;

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

/// Picks the effective log level: `RUST_LOG` overrides the configured one
fn resolve_log_level(rust_log: Option<String>, configured: &str) -> String {
    rust_log.unwrap_or_else(|| configured.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first so its log level can drive the subscriber
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = resolve_log_level(std::env::var("RUST_LOG").ok(), &config.server.logs.level);
    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .init();

    info!("Starting Claude relay with log level: {}", log_level);

    server::run(config).await?;

    Ok(())
}
