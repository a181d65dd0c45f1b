#![allow(dead_code)]

pub mod config;
pub mod mock_upstream;
pub mod server;

use std::net::SocketAddr;

use axum::Router;
use tokio_util::sync::CancellationToken;

/// Serve `app` on an ephemeral local port until the returned token is cancelled
pub async fn spawn_router(app: Router) -> anyhow::Result<(SocketAddr, CancellationToken)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let shutdown = CancellationToken::new();
    let stopped = shutdown.clone();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stopped.cancelled().await })
            .await
            .ok();
    });

    Ok((addr, shutdown))
}
