// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for the Portico proxy
//!
//! Provides the upstream client (redirects disabled, cookies handled
//! manually), the redirect resolver, and per-client session cookie storage.

mod redirect;
mod response;
mod session;
mod upstream;

pub use redirect::{RedirectResolver, MAX_REDIRECT_HOPS};
pub use response::UpstreamResponse;
pub use session::{Cookie, SessionRegistry, SessionStore, DEFAULT_SESSION_TTL};
pub use upstream::{UpstreamClient, UpstreamClientConfig};

/// Default user agent string, used when the caller forwards none
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
    pub const LOCATION: &str = "location";
    pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
    pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
}
