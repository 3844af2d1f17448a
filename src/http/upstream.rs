// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Upstream HTTP client
//!
//! Fetches target resources with redirects disabled so the redirect
//! resolver can observe every 3xx hop, and with reqwest's cookie store
//! off because session cookies are replayed from the caller's store.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use super::response::UpstreamResponse;
use super::{headers, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};

/// Upstream client configuration
#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    /// User agent sent when the caller forwards none
    pub user_agent: String,
    /// Transport timeout per request
    pub timeout: Duration,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

/// HTTP client for outbound fetches
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamClientConfig,
}

impl UpstreamClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(UpstreamClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: UpstreamClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .cookie_store(false) // cookies are replayed from the session store
            .build()?;

        Ok(Self { client, config })
    }

    /// Issue one outbound request.
    ///
    /// Headers sent upstream: `Cookie` (when the session has any),
    /// `User-Agent` (forwarded verbatim, config default otherwise), and
    /// `Content-Type: application/x-www-form-urlencoded` iff this is a
    /// POST carrying a body. Redirects are never followed here.
    pub async fn fetch(
        &self,
        url: &Url,
        method: Method,
        body: Option<Bytes>,
        user_agent: Option<&str>,
        cookie_header: Option<&str>,
    ) -> Result<UpstreamResponse> {
        debug!(%url, %method, "fetching upstream");

        let mut builder = self.client.request(method.clone(), url.clone());

        if let Some(cookie) = cookie_header {
            builder = builder.header(headers::COOKIE, cookie);
        }
        if let Some(ua) = user_agent {
            if let Ok(value) = HeaderValue::from_str(ua) {
                builder = builder.header(headers::USER_AGENT, value);
            }
        }
        if let Some(body) = body {
            if method == Method::POST {
                builder =
                    builder.header(headers::CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::unreachable(url.as_str(), e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(UpstreamResponse::new(status, headers, body, url.clone()))
    }

    /// Get client configuration
    pub fn config(&self) -> &UpstreamClientConfig {
        &self.config
    }
}
