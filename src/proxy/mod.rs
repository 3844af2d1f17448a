// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Proxy orchestration
//!
//! One logical proxied fetch: look up the caller's session, fetch the
//! target with redirect resolution, classify the final response, and
//! assemble the rewritten payload.

mod assemble;

pub use assemble::{assemble, inject_into_html, ProxyOutcome};

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use tracing::{debug, info};
use url::Url;

use crate::error::Result;
use crate::http::{
    RedirectResolver, SessionRegistry, UpstreamClient, UpstreamClientConfig,
};
use crate::rewrite::ProxyBase;

/// Proxy service configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// User agent sent when the caller forwards none
    pub user_agent: String,
    /// Transport timeout per upstream request
    pub timeout: Duration,
    /// Idle lifetime of a client session
    pub session_ttl: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        let upstream = UpstreamClientConfig::default();
        Self {
            user_agent: upstream.user_agent,
            timeout: upstream.timeout,
            session_ttl: crate::http::DEFAULT_SESSION_TTL,
        }
    }
}

/// One inbound proxied request, as seen by the service
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// Absolute target URL to fetch
    pub target: Url,
    /// GET or POST
    pub method: Method,
    /// Raw POST body, if any
    pub body: Option<Bytes>,
    /// User agent forwarded verbatim from the caller
    pub user_agent: Option<String>,
    /// Externally visible origin of the proxy for this request
    pub proxy_base: ProxyBase,
    /// Opaque session identifier of the calling browser
    pub session_id: String,
}

/// The proxy service: stateless per request except for session storage
pub struct ProxyService {
    client: UpstreamClient,
    sessions: SessionRegistry,
}

impl ProxyService {
    /// Create a service with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ProxyConfig::default())
    }

    /// Create a service with custom configuration
    pub fn with_config(config: ProxyConfig) -> Result<Self> {
        let client = UpstreamClient::with_config(UpstreamClientConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            ..Default::default()
        })?;

        Ok(Self {
            client,
            sessions: SessionRegistry::with_ttl(config.session_ttl),
        })
    }

    /// The session registry (exposed for the HTTP layer and tests)
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Execute one proxied fetch end to end
    pub async fn proxy(&self, request: ProxyRequest) -> Result<ProxyOutcome> {
        info!(url = %request.target, method = %request.method, "proxying");

        let session = self.sessions.session(&request.session_id);
        let resolver = RedirectResolver::new(&self.client, &session);
        let response = resolver
            .follow(
                request.target,
                request.method,
                request.body,
                request.user_agent.as_deref(),
            )
            .await?;

        debug!(
            status = %response.status,
            content_type = response.content_type().unwrap_or("-"),
            bytes = response.body_len(),
            "upstream resolved"
        );

        assemble(response, &request.proxy_base)
    }
}
