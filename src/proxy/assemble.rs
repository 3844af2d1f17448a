// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response assembly
//!
//! Combines rewritten content, injected assets, and headers into the
//! response handed back to the embedding browser. HTML gets the URL
//! rewrite, a style block hiding the host site's navigation chrome, and
//! the runtime interceptor script; CSS gets `url()` rewriting with its
//! status preserved; JS and binary pass through untouched. No other
//! upstream headers are forwarded.

use bytes::Bytes;
use reqwest::StatusCode;

use crate::error::Result;
use crate::http::UpstreamResponse;
use crate::rewrite::{rewrite_css, rewrite_document, shim_script, ContentKind, ProxyBase, UrlRewriter};

/// Selectors for navigation chrome that would fight the embedding page
const CHROME_HIDE_STYLE: &str =
    "header, nav, .navbar, .fixed-top, #page-header, #page-footer, .site-banner { display: none !important; }";

/// The assembled proxy response: what goes back to the caller
#[derive(Debug, Clone)]
pub struct ProxyOutcome {
    /// Status returned at the proxy boundary
    pub status: StatusCode,
    /// Content type mirrored to the caller
    pub content_type: String,
    /// Response body
    pub body: Bytes,
}

/// Assemble the outbound response for a resolved upstream fetch
pub fn assemble(response: UpstreamResponse, base: &ProxyBase) -> Result<ProxyOutcome> {
    let kind = ContentKind::from_content_type(response.content_type());
    match kind {
        ContentKind::Html => {
            let rewriter = UrlRewriter::new(response.url.clone(), base.clone());
            let rewritten = rewrite_document(&response.text_lossy(), &rewriter)?;

            let target_origin = origin_of(&response.url);
            let injected = inject_into_html(
                &rewritten,
                &format!(
                    "<style>{}</style>\n<script>{}</script>",
                    CHROME_HIDE_STYLE,
                    shim_script(&target_origin, &base.origin())
                ),
            );

            // HTML always leaves the proxy as a 200 so the iframe renders
            // whatever the chain ended on
            Ok(ProxyOutcome {
                status: StatusCode::OK,
                content_type: "text/html; charset=utf-8".to_string(),
                body: Bytes::from(injected),
            })
        }
        ContentKind::Css => {
            let rewriter = UrlRewriter::new(response.url.clone(), base.clone());
            let rewritten = rewrite_css(&response.text_lossy(), &rewriter);
            Ok(ProxyOutcome {
                status: response.status,
                content_type: "text/css".to_string(),
                body: Bytes::from(rewritten),
            })
        }
        ContentKind::Js | ContentKind::Binary => Ok(ProxyOutcome {
            status: response.status,
            content_type: response
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string(),
            body: response.body,
        }),
    }
}

/// Inject a block of markup before `</head>`, falling back to the start
/// of `<body>`, falling back to the start of the document.
pub fn inject_into_html(html: &str, block: &str) -> String {
    if let Some(idx) = find_ignore_case(html, "</head>") {
        let mut out = String::with_capacity(html.len() + block.len());
        out.push_str(&html[..idx]);
        out.push_str(block);
        out.push_str(&html[idx..]);
        return out;
    }
    if let Some(open) = find_ignore_case(html, "<body") {
        if let Some(end) = html[open..].find('>') {
            let idx = open + end + 1;
            let mut out = String::with_capacity(html.len() + block.len());
            out.push_str(&html[..idx]);
            out.push_str(block);
            out.push_str(&html[idx..]);
            return out;
        }
    }
    format!("{block}{html}")
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

fn origin_of(url: &url::Url) -> String {
    let port = url
        .port()
        .map(|p| format!(":{p}"))
        .unwrap_or_default();
    format!("{}://{}{}", url.scheme(), url.host_str().unwrap_or(""), port)
}
