//! HTTP server lifecycle for the web gateway.

use std::net::SocketAddr;

use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::ServerError;

/// Configuration for the web server.
pub struct WebServerConfig {
    /// Address to bind the server to.
    pub addr: SocketAddr,
}

/// Hosts the gateway router.
///
/// `start()` binds the listener and spawns the server task; `shutdown()`
/// stops it gracefully.
pub struct WebServer {
    config: WebServerConfig,
    router: Option<Router>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl WebServer {
    /// Create a new server for a router that already has its state applied.
    pub fn new(config: WebServerConfig, router: Router) -> Self {
        Self {
            config,
            router: Some(router),
            shutdown_tx: None,
            handle: None,
        }
    }

    /// Bind the listener and spawn the server.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        let app = self.router.take().ok_or_else(|| ServerError::StartupFailed {
            name: "web".to_string(),
            reason: "Server already started".to_string(),
        })?;

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .map_err(|e| ServerError::StartupFailed {
                name: "web".to_string(),
                reason: format!("Failed to bind to {}: {}", self.config.addr, e),
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::StartupFailed {
                name: "web".to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!("Web server listening on http://{}", local_addr);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                    tracing::info!("Web server shutting down");
                })
                .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        self.handle = Some(handle);
        Ok(local_addr)
    }

    /// Signal graceful shutdown and wait for the server task to finish.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;

    use super::*;

    fn config() -> WebServerConfig {
        WebServerConfig {
            addr: "127.0.0.1:0".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_start_serves_and_shuts_down() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let mut server = WebServer::new(config(), router);

        let addr = server.start().await.unwrap();
        assert_ne!(addr.port(), 0);

        let body = reqwest::get(format!("http://{}/ping", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let mut server = WebServer::new(config(), Router::new());
        server.start().await.unwrap();

        let result = server.start().await;
        assert!(matches!(result, Err(ServerError::StartupFailed { .. })));

        server.shutdown().await;
    }
}
