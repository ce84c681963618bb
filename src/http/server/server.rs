//! HTTP server implementation.
//

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait};
use crate::controller::controller::Controller;
use crate::middleware::middleware::Middleware;

const DEFAULT_NAME: &str = "pressdash";
const DEFAULT_PORT: &str = "8000";

/// HTTP server implementation.
pub struct HttpServer {
    shutdown_token: CancellationToken,
    config: Config,
    router: Router,
}

impl HttpServer {
    /// Creates a new HTTP server.
    pub fn new(
        shutdown_token: CancellationToken,
        config: Config,
        controllers: Vec<Box<dyn Controller>>,
        middlewares: Vec<Box<dyn Middleware>>,
    ) -> Self {
        let router = Self::build_router(controllers);
        let router = Self::merge_middlewares(&config, router, middlewares);

        Self {
            shutdown_token,
            config,
            router,
        }
    }

    fn name(&self) -> &str {
        self.config
            .api()
            .and_then(|a| a.name.as_deref())
            .unwrap_or(DEFAULT_NAME)
    }

    /// Binds the configured port. Port `0` picks an ephemeral one; the bound
    /// address is available from the returned listener.
    pub async fn bind(&self) -> Result<TcpListener> {
        let port = self
            .config
            .api()
            .and_then(|a| a.port.as_deref())
            .unwrap_or(DEFAULT_PORT);
        let port = port.trim_start_matches(':');

        let addr: SocketAddr = format!("0.0.0.0:{port}")
            .parse()
            .context("failed to parse server address")?;

        TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind TCP listener on {addr}"))
    }

    /// Serves on the listener until the shutdown token is cancelled.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let name = self.name();
        let addr = listener
            .local_addr()
            .context("failed to read listener address")?;

        info!(
            component = "server",
            event = "started",
            name = name,
            addr = %addr,
            "server started"
        );

        let shutdown_token = self.shutdown_token.clone();
        let serve_future =
            axum::serve(listener, self.router.clone()).with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            });

        if let Err(e) = serve_future.await {
            error!(
                component = "server",
                event = "listen_and_serve_failed",
                name = name,
                addr = %addr,
                error = %e,
                "server failed to listen and serve"
            );
            return Err(e.into());
        }

        info!(
            component = "server",
            event = "stopped",
            name = name,
            addr = %addr,
            "server stopped"
        );

        Ok(())
    }

    /// Builds the router with all controllers.
    fn build_router(controllers: Vec<Box<dyn Controller>>) -> Router {
        let mut router = Router::new();
        for controller in controllers {
            router = controller.add_route(router);
        }
        router
    }

    /// Merges middlewares into the router. The first middleware ends up outermost.
    fn merge_middlewares(
        config: &Config,
        router: Router,
        middlewares: Vec<Box<dyn Middleware>>,
    ) -> Router {
        let mut result = router.layer(TimeoutLayer::new(config.request_timeout()));
        for middleware in middlewares.iter().rev() {
            result = middleware.apply(result);
        }
        result
    }
}
