use docserve::config::Config;
use docserve::net;
use docserve::server::{FileServer, ServerOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let server = FileServer::new(ServerOptions::from(&cfg.server));

    let started = server.start(cfg.server.port, &cfg.server.document_root).await;
    if !started.success {
        anyhow::bail!(started.error.unwrap_or_else(|| "failed to start".to_string()));
    }

    let port = started.port.unwrap_or(cfg.server.port);
    tracing::info!(url = ?started.local_url, "Serving locally");
    match net::wifi_ip_address() {
        Ok(ip) => tracing::info!(
            url = %format!("http://{}:{}", ip, port),
            wifi = net::is_wifi_connected(),
            "Reachable on the local network"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not determine a LAN address"),
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");

    let stopped = server.stop().await;
    if let Some(e) = stopped.error {
        anyhow::bail!(e);
    }

    Ok(())
}
