// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS `url()` rewriting
//!
//! Stylesheets are fetched by the browser directly, so every `url()`
//! token must be routed through the proxy or the load dies on a
//! cross-origin error. References are classified and resolved exactly
//! like HTML attributes; `data:` URIs, already-routed references, and
//! tokens that fail to resolve are left byte-identical.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::urls::UrlRewriter;

lazy_static! {
    static ref CSS_URL_RE: Regex = Regex::new(r"url\(\s*([^)]*?)\s*\)").unwrap();
}

/// Rewrite every `url(...)` token in a stylesheet (or inline `style`
/// text) to the proxy-routed form.
pub fn rewrite_css(css: &str, rewriter: &UrlRewriter) -> String {
    CSS_URL_RE
        .replace_all(css, |caps: &Captures| {
            let token = &caps[1];
            let (quote, inner) = strip_quotes(token);
            match rewriter.rewrite_subresource(inner) {
                Some(routed) => format!("url({quote}{routed}{quote})"),
                // Recover locally: a malformed reference never aborts
                // the rest of the stylesheet
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Split a `url()` payload into its quote character (if any) and the
/// unquoted reference
fn strip_quotes(token: &str) -> (&str, &str) {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return (&token[..1], &token[1..token.len() - 1]);
        }
    }
    ("", token)
}
