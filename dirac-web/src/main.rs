use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dirac_web::config::WebConfig;
use dirac_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dirac_web=info,dirac_client=info,tower_http=info")),
        )
        .init();

    let config = WebConfig::from_env()?;
    let addr = config.listen_addr();
    tracing::info!(dirac_url = %config.dirac_url, name = %config.name, "loaded config");

    let state = AppState::new(config)?;
    let app = dirac_web::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("dirac-web listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("received ctrl-c, shutting down");
        })
        .await?;

    Ok(())
}
