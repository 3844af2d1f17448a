// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Route handlers.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, Response};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use crate::http::headers::{X_FORWARDED_HOST, X_FORWARDED_PROTO};
use crate::proxy::ProxyRequest;
use crate::rewrite::ProxyBase;

use super::error::{ApiError, Result};
use super::state::AppState;

/// Name of the proxy-owned cookie carrying the session identifier.
/// Never forwarded upstream.
pub const SESSION_COOKIE: &str = "portico_sid";

/// Query parameters of the proxy endpoint.
#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    /// Percent-encoded absolute target URL.
    pub url: Option<String>,
}

/// GET|POST /api/proxy?url=... - fetch a target and return it rewritten.
pub async fn proxy(
    State(state): State<AppState>,
    method: Method,
    Query(params): Query<ProxyParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response<Body>> {
    let raw_url = params
        .url
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingParameter)?;

    let target = Url::parse(&raw_url).map_err(|e| {
        error!(url = %raw_url, error = %e, "rejecting unparsable target URL");
        ApiError::Upstream
    })?;

    let proxy_base = proxy_base_from(&headers);
    let user_agent = header_str(&headers, "user-agent").map(str::to_string);

    let (session_id, fresh_session) = match session_id_from(&headers) {
        Some(id) => (id, false),
        None => (state.service.sessions().new_id(), true),
    };

    debug!(
        url = %target,
        %method,
        base = %proxy_base.origin(),
        fresh_session,
        "inbound proxy request"
    );

    let outcome = state
        .service
        .proxy(ProxyRequest {
            target,
            method: method.clone(),
            body: (method == Method::POST && !body.is_empty()).then_some(body),
            user_agent,
            proxy_base,
            session_id: session_id.clone(),
        })
        .await
        .map_err(|e| {
            error!(error = %e, "proxy fetch failed");
            ApiError::Upstream
        })?;

    let mut builder = Response::builder()
        .status(outcome.status)
        .header("content-type", outcome.content_type);
    if fresh_session {
        builder = builder.header(
            "set-cookie",
            format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax"),
        );
    }

    builder
        .body(Body::from(outcome.body))
        .map_err(|_| ApiError::Upstream)
}

/// GET /healthz - liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Derive the externally visible proxy origin for this request.
///
/// `X-Forwarded-Proto`/`X-Forwarded-Host` win (the proxy may sit behind
/// another reverse hop); otherwise the inbound request's own host and a
/// plain-listener `http` scheme.
pub fn proxy_base_from(headers: &HeaderMap) -> ProxyBase {
    let proto = header_str(headers, X_FORWARDED_PROTO)
        .map(first_forwarded_value)
        .unwrap_or("http");
    let host = header_str(headers, X_FORWARDED_HOST)
        .map(first_forwarded_value)
        .or_else(|| header_str(headers, "host"))
        .unwrap_or("localhost");
    ProxyBase::new(proto, host)
}

/// Extract this browser's session identifier from the inbound
/// `Cookie` header, if it has one.
pub fn session_id_from(headers: &HeaderMap) -> Option<String> {
    let cookie_header = header_str(headers, "cookie")?;
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Forwarding headers may carry a comma-separated hop list; the first
/// entry is the client-facing one.
fn first_forwarded_value(value: &str) -> &str {
    value.split(',').next().unwrap_or(value).trim()
}
