use anyhow::{Context, Result};
use sgm_edge::web::{router, AppState};
use sgm_edge::{Config, DataGateway};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    sgm_edge::init_tracing();

    let config = Config::from_env().context("Failed to read configuration")?;
    let gateway = DataGateway::from_config(&config).context("Failed to build gateway")?;

    let app = router(AppState::new(gateway));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Starting web server at http://{}", config.bind_addr);
    println!("Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
