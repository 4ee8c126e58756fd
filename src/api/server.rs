//! HTTP server lifecycle: bind, serve, shut down on Ctrl-C.

use std::net::SocketAddr;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

pub async fn serve(ctx: ApiContext) -> Result<(), std::io::Error> {
    let addr: SocketAddr = ctx
        .config
        .bind_addr
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{e}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, api_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
