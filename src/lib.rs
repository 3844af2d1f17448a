// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Portico - Transparent Content-Rewriting HTTP Proxy
//!
//! Fetches a target URL server-side, tracks session cookies on the
//! caller's behalf, rewrites every embedded reference so follow-on
//! traffic routes back through the proxy, and returns the transformed
//! payload for rendering inside an iframe as if it were the origin site.
//!
//! ## Features
//!
//! - Session tracking: per-browser upstream cookie identity, replayed on
//!   every outbound request
//! - Manual redirect resolution: cookies captured on every 3xx hop
//! - Structural HTML rewriting: links, forms, scripts, stylesheets, and
//!   inline CSS `url()` rewritten via a tolerant html5ever tree pass
//! - Runtime interception: injected script patches `XMLHttpRequest`,
//!   `fetch`, and dynamic `<script>` creation so AJAX-heavy pages stay
//!   inside the proxy
//! - Content classification: HTML/CSS pipelines, JS and binary
//!   pass-through
//!
//! ## Example
//!
//! ```rust,no_run
//! use portico::{ProxyService, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ProxyService::new()?;
//!     let server = Server::new(ServerConfig::default(), service)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod proxy;
pub mod rewrite;
pub mod server;

// Re-exports for convenience

// Errors
pub use error::{Error, Result};

// HTTP layer
pub use http::{
    Cookie, RedirectResolver, SessionRegistry, SessionStore, UpstreamClient,
    UpstreamClientConfig, UpstreamResponse, MAX_REDIRECT_HOPS,
};

// Rewriting
pub use rewrite::{
    rewrite_css, rewrite_document, shim_script, ContentKind, ProxyBase, RefKind, UrlRewriter,
};

// Proxy orchestration
pub use proxy::{ProxyConfig, ProxyOutcome, ProxyRequest, ProxyService};

// Server
pub use server::{ApiError, AppState, Server, ServerConfig, SESSION_COOKIE};

/// Portico version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
