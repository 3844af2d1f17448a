// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Upstream response envelope

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use super::headers;

/// A raw upstream response: status, headers, body, and the URL that
/// produced it. Flows unchanged through to assembly except where a
/// rewrite pipeline applies.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
    /// URL this response was fetched from (redirects are not followed
    /// by the client, so this is always the requested URL)
    pub url: Url,
}

impl UpstreamResponse {
    /// Create a new response envelope
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes, url: Url) -> Self {
        Self {
            status,
            headers,
            body,
            url,
        }
    }

    /// Check if status is a redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Get the declared content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    /// Get all `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<&str> {
        self.header_all(headers::SET_COOKIE)
    }

    /// Get the `Location` header, if any
    pub fn location(&self) -> Option<&str> {
        self.header(headers::LOCATION)
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(status: StatusCode, headers: HeaderMap) -> UpstreamResponse {
        UpstreamResponse::new(
            status,
            headers,
            Bytes::new(),
            Url::parse("https://example.com/").unwrap(),
        )
    }

    #[test]
    fn test_redirect_detection() {
        let resp = response_with(StatusCode::FOUND, HeaderMap::new());
        assert!(resp.is_redirect());

        let resp = response_with(StatusCode::OK, HeaderMap::new());
        assert!(!resp.is_redirect());
    }

    #[test]
    fn test_set_cookie_accessor_collects_all_values() {
        let mut headers = HeaderMap::new();
        headers.append(headers::SET_COOKIE, "a=1; Path=/".parse().unwrap());
        headers.append(headers::SET_COOKIE, "b=2".parse().unwrap());

        let resp = response_with(StatusCode::OK, headers);
        assert_eq!(resp.set_cookies(), vec!["a=1; Path=/", "b=2"]);
    }
}
