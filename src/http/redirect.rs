// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Manual redirect resolution
//!
//! The upstream client never follows redirects on its own; this resolver
//! chases 3xx chains hop by hop so session cookies set on intermediate
//! responses are captured even though the caller never sees them.

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

use super::response::UpstreamResponse;
use super::session::SessionStore;
use super::upstream::UpstreamClient;
use crate::error::{Error, Result};

/// Maximum number of redirect hops followed for one logical fetch.
/// Past this bound the last redirect response is surfaced as-is, so a
/// legitimate redirect loop shows up as what it is instead of a proxy
/// failure.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Chases redirect chains on behalf of one proxied request
pub struct RedirectResolver<'a> {
    client: &'a UpstreamClient,
    session: &'a SessionStore,
}

impl<'a> RedirectResolver<'a> {
    /// Create a resolver bound to a client and a session store
    pub fn new(client: &'a UpstreamClient, session: &'a SessionStore) -> Self {
        Self { client, session }
    }

    /// Fetch `url`, following redirects up to [`MAX_REDIRECT_HOPS`].
    ///
    /// Every response along the chain (including the final one) has its
    /// `Set-Cookie` headers recorded into the session store, and each
    /// follow-up request carries the refreshed `Cookie` header. `Location`
    /// is resolved against the current hop's URL, not the original.
    pub async fn follow(
        &self,
        url: Url,
        method: Method,
        body: Option<Bytes>,
        user_agent: Option<&str>,
    ) -> Result<UpstreamResponse> {
        let mut current = url;
        let mut method = method;
        let mut body = body;
        let mut hops = 0usize;

        loop {
            let cookie_header = self.session.cookie_header();
            let response = self
                .client
                .fetch(&current, method.clone(), body.clone(), user_agent, cookie_header.as_deref())
                .await?;

            self.session.record(response.set_cookies());

            if !response.is_redirect() {
                return Ok(response);
            }

            let location = response.location().map(str::to_string);
            let Some(location) = location else {
                // 3xx without Location: nothing to follow
                return Ok(response);
            };

            hops += 1;
            if hops > MAX_REDIRECT_HOPS {
                warn!(url = %current, hops, "redirect bound reached, surfacing last response");
                return Ok(response);
            }

            let next = current.join(&location).map_err(|e| {
                Error::upstream(format!("unparsable redirect location {location:?}: {e}"))
            })?;
            debug!(from = %current, to = %next, status = %response.status, "following redirect");

            // Browser semantics: 303, and 301/302 answering a POST,
            // re-issue as GET without the body; 307/308 preserve both.
            if response.status == StatusCode::SEE_OTHER
                || (method == Method::POST
                    && matches!(
                        response.status,
                        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND
                    ))
            {
                method = Method::GET;
                body = None;
            }

            current = next;
        }
    }
}
