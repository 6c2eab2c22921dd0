use anyhow::Context;
use imdb_engine::ImdbClient;
use imdb_server::{logging, router, AppState, ServerConfig};
use scrape_logging::{scrape_info, scrape_warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("reading IMDB_* configuration")?;
    logging::initialize(config.log_destination, config.log_level);

    let client = ImdbClient::with_reqwest(config.fetch.clone(), config.client.clone())
        .context("building upstream HTTP client")?;
    let app = router(AppState::new(client, config.info.clone()));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    scrape_info!(
        "imdb_server {} listening on {} (upstream {})",
        config.info.version,
        config.bind_addr,
        config.client.base_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    scrape_info!("imdb_server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        scrape_warn!("cannot listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    scrape_info!("shutdown requested");
}
