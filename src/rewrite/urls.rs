// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Reference classification and proxy routing
//!
//! Every URL found in fetched content is classified first and rewritten
//! second; rewrites converge to the canonical proxy-routed form
//! `{proxy base}/api/proxy?url=<percent-encoded absolute URL>`, and
//! running the rewriter over its own output is a fixed point.

use url::Url;

/// Path of the proxy endpoint, shared by server routes and rewriting
pub const PROXY_ROUTE_PATH: &str = "/api/proxy";

/// Marker every proxy-routed URL contains; used as the idempotence guard
const PROXY_ROUTE_MARKER: &str = "/api/proxy?url=";

/// How a reference found in content relates to the target document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Absolute `http:`/`https:` URL
    AbsoluteHttp,
    /// `//host/path`
    ProtocolRelative,
    /// `/path`
    RootRelative,
    /// `path`, `../path`, `?query`
    Relative,
    /// `#fragment` (or empty)
    FragmentOnly,
    /// `data:`, `javascript:`, `mailto:`, `tel:`, `blob:`, ...
    NonHttpScheme,
    /// Already in proxy-routed form
    AlreadyProxied,
}

/// The externally visible origin of the proxy itself, derived per
/// request from forwarding headers; never hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyBase {
    scheme: String,
    host: String,
}

impl ProxyBase {
    /// Create a proxy base from a scheme and a host (host may carry a port)
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// The proxy origin, `scheme://host`
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Prefix of every proxy-routed URL
    pub fn route_prefix(&self) -> String {
        format!("{}{}?url=", self.origin(), PROXY_ROUTE_PATH)
    }
}

/// Rewrites references against a known target URL and proxy base
#[derive(Debug, Clone)]
pub struct UrlRewriter {
    target: Url,
    base: ProxyBase,
}

impl UrlRewriter {
    /// Create a rewriter for content fetched from `target`
    pub fn new(target: Url, base: ProxyBase) -> Self {
        Self { target, base }
    }

    /// The target URL this content was fetched from
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// The proxy base used for routed URLs
    pub fn base(&self) -> &ProxyBase {
        &self.base
    }

    /// Classify a raw reference string
    pub fn classify(&self, raw: &str) -> RefKind {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return RefKind::FragmentOnly;
        }
        if trimmed.contains(PROXY_ROUTE_MARKER) {
            return RefKind::AlreadyProxied;
        }
        if trimmed.starts_with("//") {
            return RefKind::ProtocolRelative;
        }
        if let Some(scheme) = leading_scheme(trimmed) {
            return if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
            {
                RefKind::AbsoluteHttp
            } else {
                RefKind::NonHttpScheme
            };
        }
        if trimmed.starts_with('/') {
            RefKind::RootRelative
        } else {
            RefKind::Relative
        }
    }

    /// Resolve a reference to an absolute URL.
    ///
    /// Protocol-relative references are prefixed with `https:`;
    /// root-relative and document-relative ones are joined against the
    /// target URL with standard base-URL semantics.
    pub fn resolve(&self, raw: &str) -> Option<Url> {
        let trimmed = raw.trim();
        match self.classify(trimmed) {
            RefKind::AbsoluteHttp => Url::parse(trimmed).ok(),
            RefKind::ProtocolRelative => Url::parse(&format!("https:{}", trimmed)).ok(),
            RefKind::RootRelative | RefKind::Relative => self.target.join(trimmed).ok(),
            _ => None,
        }
    }

    /// Build the proxy-routed form of an absolute URL
    pub fn proxy_route(&self, absolute: &Url) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(absolute.as_str().as_bytes()).collect();
        format!("{}{}", self.base.route_prefix(), encoded)
    }

    /// Check whether an absolute URL shares the target's origin
    pub fn is_target_origin(&self, url: &Url) -> bool {
        url.origin() == self.target.origin()
    }

    /// Rewrite policy for anchors (`<a href>`): only references that
    /// resolve to the target's own origin are routed; everything else
    /// (other origins, non-http schemes, fragments) is left untouched.
    pub fn rewrite_anchor(&self, raw: &str) -> Option<String> {
        let resolved = self.resolve(raw)?;
        if self.is_target_origin(&resolved) {
            Some(self.proxy_route(&resolved))
        } else {
            None
        }
    }

    /// Rewrite policy for form actions: any reference that resolves to
    /// an absolute http(s) URL is routed so submissions come back
    /// through the proxy.
    pub fn rewrite_form_action(&self, raw: &str) -> Option<String> {
        let resolved = self.resolve(raw)?;
        Some(self.proxy_route(&resolved))
    }

    /// Rewrite policy for subresources (`img src`, `script src`,
    /// `link href`, CSS `url()`): routed regardless of origin, since the
    /// browser fetches these directly and must not leave the proxy;
    /// `data:` URIs and already-routed references are skipped.
    pub fn rewrite_subresource(&self, raw: &str) -> Option<String> {
        let resolved = self.resolve(raw)?;
        Some(self.proxy_route(&resolved))
    }
}

/// Extract a leading URL scheme (`http`, `data`, `mailto`, ...), if the
/// string starts with one. The colon must appear before any `/`, `?`, `#`.
fn leading_scheme(s: &str) -> Option<&str> {
    let colon = s.find(':')?;
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    for stop in ['/', '?', '#'] {
        if let Some(idx) = s.find(stop) {
            if idx < colon {
                return None;
            }
        }
    }
    Some(scheme)
}
