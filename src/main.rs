use std::net::SocketAddr;
use std::time::Duration;

use talent_backend::{config::init_config, database::create_store, routes, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = init_config()?;

    let store = create_store(&config.database_url).await?;
    let app_state = AppState::new(store, config.clone())?;

    {
        let twitter = app_state.twitter_service.clone();
        tokio::spawn(async move {
            loop {
                match twitter.purge_expired().await {
                    Ok(0) => {}
                    Ok(purged) => info!(purged, "purged expired Twitter login states"),
                    Err(e) => tracing::error!(error = ?e, "pending login purge failed"),
                }
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        });
    }

    let app = routes::router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
