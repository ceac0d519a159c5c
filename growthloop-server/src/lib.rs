//! growthloop-server: the HTTP surface for the campaign orchestration
//! engine, grounded on `vibes_server::VibesServer`'s bind/serve/shutdown
//! shape.

mod error;
pub mod http;
pub mod middleware;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use error::ApiError;
pub use http::create_router;
pub use middleware::{auth_middleware, AuthContext};
pub use state::AppState;

/// Resolves when a shutdown signal is received. On Unix, listens for
/// both SIGTERM and Ctrl-C.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C, initiating graceful shutdown"),
        () = terminate => tracing::info!("received SIGTERM, initiating graceful shutdown"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Internal(String),
}

/// The growthloop HTTP server.
pub struct GrowthloopServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl GrowthloopServer {
    #[must_use]
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind { addr: addr.clone(), source: e })?;
        self.run_with_listener(listener).await
    }

    /// Useful for tests that bind to port 0 and read back the real address.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        self.run_with_graceful_shutdown(listener, shutdown_signal())
            .await
    }

    pub async fn run_with_graceful_shutdown<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!(%addr, "growthloop server listening");

        let router = create_router(self.state);
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Host/port the HTTP server binds to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
