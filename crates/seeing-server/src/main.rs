//! Seeing — turns an uploaded image into a spoken description.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use seeing_core::OrchestratorConfig;
use seeing_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "--config" | "config" => {
                let config = OrchestratorConfig::from_env()?;
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Seeing — image to spoken description orchestrator");
                println!();
                println!("Usage: seeing [command]");
                println!();
                println!("Commands:");
                println!("  (none)    Start the server");
                println!("  config    Print the resolved configuration");
                println!("  help      Show this help message");
                println!();
                println!("Environment:");
                println!("  PORT, STORAGE_SERVICE_URL, IMAGE_SOUND_SERVICE_URL,");
                println!("  LANDMARK_SERVICE_URL, UPSTREAM_TIMEOUT_SECS,");
                println!("  UPSTREAM_CONNECT_TIMEOUT_SECS, MAX_UPLOAD_BYTES");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'seeing help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = OrchestratorConfig::from_env()?;
    let port = config.port;

    info!("STORAGE_SERVICE_URL: {}", config.services.storage);
    info!("IMAGE_SOUND_SERVICE_URL: {}", config.services.image_sound);
    info!("LANDMARK_SERVICE_URL: {}", config.services.landmark);
    info!(
        "Upstream timeouts: total={:?}, connect={:?}",
        config.timeouts.total, config.timeouts.connect
    );

    // Build application state
    let state = Arc::new(AppState::new(config)?);

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Seeing orchestrator listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
