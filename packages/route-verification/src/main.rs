use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_verification::{
    build_router,
    config::Config,
    services::{
        routing::OsrmClient, upload::MemoryUploadSink, verification::VerificationService,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_verification=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting route verification service");
    info!(
        "Routing via {} ({} points, {}m radius)",
        config.osrm_url, config.inspection_points, config.verification_radius_meters
    );

    let routing = OsrmClient::new(&config.osrm_url, config.routing_timeout())
        .context("Failed to initialize routing client")?;

    let service = Arc::new(VerificationService::new(
        Arc::new(routing),
        Arc::new(MemoryUploadSink::new()),
        config.verification_settings(),
    ));

    // Sessions are only removed by DELETE; sweep the ones clients abandoned
    let ttl = config.session_ttl();
    let max_age = chrono::Duration::from_std(ttl).context("Session TTL out of range")?;
    let sweeper = service.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ttl / 4);
        loop {
            ticker.tick().await;
            sweeper.sweep_expired(max_age).await;
        }
    });
    info!("Sweeping sessions older than {}s", ttl.as_secs());

    let app = build_router(service);

    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Invalid listen address")?;
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    info!("Shutting down...");
    Ok(())
}
