// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP surface of the proxy.
//!
//! ## Endpoints
//!
//! - `GET|POST /api/proxy?url=<percent-encoded absolute URL>` - fetch the
//!   target server-side and return the rewritten payload
//! - `GET /healthz` - liveness probe
//!
//! ## Example
//!
//! ```no_run
//! use portico::{ProxyService, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = ProxyService::new().unwrap();
//!     let server = Server::new(ServerConfig::default(), service).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod error;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::error::{Error, Result};
use crate::proxy::ProxyService;
use crate::rewrite::PROXY_ROUTE_PATH;

pub use error::ApiError;
pub use handlers::{proxy_base_from, session_id_from, SESSION_COOKIE};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8870;

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 8870).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

/// The HTTP server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a server around a proxy service.
    pub fn new(config: ServerConfig, service: ProxyService) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address: {e}")))?;

        Ok(Self {
            router: router(AppState::new(service)),
            addr,
        })
    }

    /// The address the server will bind to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Binds and serves until the process exits.
    pub async fn run(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

/// Builds the router; exposed so tests can drive the surface on an
/// ephemeral listener.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            PROXY_ROUTE_PATH,
            get(handlers::proxy).post(handlers::proxy),
        )
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
