#![allow(clippy::must_use_candidate)]

mod error;
mod handler;
mod state;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use relay_config::Config;
use relay_preprocess::{Pipeline, TracingDiagnostics};
use tower_http::trace::TraceLayer;

pub use error::ProxyError;
pub use handler::ChatCompletionRequest;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Loads the tokenizer tables, so this is best done once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be built
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address();

        let pipeline = Pipeline::from_config(&config.preprocess, &config.tokenizer, Arc::new(TracingDiagnostics));
        let upstream = upstream::UpstreamClient::new(&config.upstream)?;
        tracing::debug!(url = upstream.completions_url(), "upstream configured");

        let state = state::AppState::new(pipeline, upstream);

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(handler::health_handler));
        }

        app = app.merge(handler::chat_router(state));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
