use anyhow::Result;
use std::env;
use std::path::PathBuf;
use tracing::info;
use web_tools::config::Config;
use web_tools::server::{start_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Optional config file path as the only argument
    let args: Vec<String> = env::args().collect();
    let config_path = match args.len() {
        1 => PathBuf::from("web-tools.toml"),
        2 => PathBuf::from(&args[1]),
        _ => {
            eprintln!("Usage: {} [config-file]", args[0]);
            std::process::exit(1);
        }
    };

    let config = Config::load(&config_path)?;
    info!(
        "Loaded configuration: port {}, {} CORS origins",
        config.port,
        config.cors_origins.len()
    );

    let state = AppState::new(&config);

    info!("Starting web-tools server on port {}", config.port);
    start_server(state, &config).await?;

    Ok(())
}
