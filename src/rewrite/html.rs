// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Structural HTML rewriting using html5ever
//!
//! The document is parsed into a tolerant tree, URL-bearing attributes
//! are rewritten in place, and the tree is serialized back. This keeps
//! malformed markup, nested quotes, and odd whitespace from derailing
//! the rewrite the way text-level scanning would.
//!
//! Per-element policy (classification always runs before rewriting):
//! - `<a href>`: routed only when the resolved origin is the target's
//! - `<form action>`: routed to bring submissions back through the proxy
//! - `<img src>`, `<script src>`, `<link href>`: routed for any origin,
//!   skipping `data:` URIs and already-routed references
//! - `<style>` text and `style` attributes: CSS `url()` rewriting
//!
//! A reference that fails to resolve is left byte-identical; one bad
//! attribute never aborts the rest of the document.

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use super::css::rewrite_css;
use super::urls::UrlRewriter;
use crate::error::{Error, Result};

/// Rewrite every embedded reference in an HTML document to the
/// proxy-routed form. Returns the re-serialized document.
pub fn rewrite_document(html: &str, rewriter: &UrlRewriter) -> Result<String> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| Error::rewrite(format!("parse failed: {e}")))?;

    rewrite_node(&dom.document, rewriter);

    let document: SerializableHandle = dom.document.clone().into();
    let mut out = Vec::new();
    serialize(&mut out, &document, SerializeOpts::default())
        .map_err(|e| Error::rewrite(format!("serialize failed: {e}")))?;

    String::from_utf8(out).map_err(|e| Error::rewrite(format!("non-UTF-8 output: {e}")))
}

fn rewrite_node(handle: &Handle, rewriter: &UrlRewriter) {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = handle.data
    {
        let tag = name.local.as_ref();

        for attr in attrs.borrow_mut().iter_mut() {
            let attr_name = attr.name.local.as_ref();
            let value = attr.value.to_string();

            let replacement = match (tag, attr_name) {
                ("a", "href") => rewriter.rewrite_anchor(&value),
                ("form", "action") => rewriter.rewrite_form_action(&value),
                ("img", "src") | ("script", "src") | ("link", "href") => {
                    rewriter.rewrite_subresource(&value)
                }
                (_, "style") => {
                    let rewritten = rewrite_css(&value, rewriter);
                    (rewritten != value).then_some(rewritten)
                }
                _ => None,
            };

            if let Some(new_value) = replacement {
                attr.value = StrTendril::from_slice(&new_value);
            }
        }

        if tag == "style" {
            for child in handle.children.borrow().iter() {
                if let NodeData::Text { ref contents } = child.data {
                    let text = contents.borrow().to_string();
                    let rewritten = rewrite_css(&text, rewriter);
                    if rewritten != text {
                        *contents.borrow_mut() = StrTendril::from_slice(&rewritten);
                    }
                }
            }
        }
    }

    for child in handle.children.borrow().iter() {
        rewrite_node(child, rewriter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::urls::ProxyBase;
    use url::Url;

    fn rewriter() -> UrlRewriter {
        UrlRewriter::new(
            Url::parse("https://site.example/course/view.php?id=22").unwrap(),
            ProxyBase::new("https", "proxy.example"),
        )
    }

    #[test]
    fn test_same_origin_anchor_is_routed() {
        let out =
            rewrite_document(r#"<a href="/course/view.php?id=5">go</a>"#, &rewriter()).unwrap();
        assert!(out.contains(
            r#"href="https://proxy.example/api/proxy?url=https%3A%2F%2Fsite.example%2Fcourse%2Fview.php%3Fid%3D5""#
        ));
    }

    #[test]
    fn test_special_anchors_are_never_rewritten() {
        let html = concat!(
            r#"<a href="mailto:a@b.com">mail</a>"#,
            r##"<a href="#section">jump</a>"##,
            r#"<a href="https://other.example/page">ext</a>"#,
            r#"<a href="javascript:void(0)">js</a>"#,
        );
        let out = rewrite_document(html, &rewriter()).unwrap();
        assert!(out.contains(r#"href="mailto:a@b.com""#));
        assert!(out.contains(r##"href="#section""##));
        assert!(out.contains(r#"href="https://other.example/page""#));
        assert!(out.contains(r#"href="javascript:void(0)""#));
    }

    #[test]
    fn test_subresources_are_routed_and_data_uris_skipped() {
        let html = concat!(
            r#"<img src="/logo.png">"#,
            r#"<img src="data:image/png;base64,AAAA">"#,
            r#"<script src="//cdn.example/lib.js"></script>"#,
            r#"<link rel="stylesheet" href="theme.css">"#,
        );
        let out = rewrite_document(html, &rewriter()).unwrap();
        assert!(out.contains(
            r#"src="https://proxy.example/api/proxy?url=https%3A%2F%2Fsite.example%2Flogo.png""#
        ));
        assert!(out.contains(r#"src="data:image/png;base64,AAAA""#));
        assert!(out.contains(
            r#"src="https://proxy.example/api/proxy?url=https%3A%2F%2Fcdn.example%2Flib.js""#
        ));
        assert!(out.contains(
            r#"href="https://proxy.example/api/proxy?url=https%3A%2F%2Fsite.example%2Fcourse%2Ftheme.css""#
        ));
    }

    #[test]
    fn test_form_action_is_routed() {
        let out = rewrite_document(
            r#"<form action="/login/index.php" method="post"></form>"#,
            &rewriter(),
        )
        .unwrap();
        assert!(out.contains(
            r#"action="https://proxy.example/api/proxy?url=https%3A%2F%2Fsite.example%2Flogin%2Findex.php""#
        ));
    }

    #[test]
    fn test_style_element_and_attribute_are_rewritten() {
        let html = concat!(
            r#"<style>body{background:url(/img/bg.png)}</style>"#,
            r#"<div style="background:url('/img/tile.png')"></div>"#,
        );
        let out = rewrite_document(html, &rewriter()).unwrap();
        assert!(out.contains(
            "url(https://proxy.example/api/proxy?url=https%3A%2F%2Fsite.example%2Fimg%2Fbg.png)"
        ));
        assert!(out.contains(
            "url('https://proxy.example/api/proxy?url=https%3A%2F%2Fsite.example%2Fimg%2Ftile.png')"
        ));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let html = concat!(
            r#"<a href="/course/view.php?id=5">go</a>"#,
            r#"<img src="/logo.png">"#,
            r#"<style>body{background:url(/img/bg.png)}</style>"#,
        );
        let once = rewrite_document(html, &rewriter()).unwrap();
        let twice = rewrite_document(&once, &rewriter()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_malformed_reference_is_left_alone() {
        let html = r#"<a href="http://[bad">broken</a><a href="/ok">fine</a>"#;
        let out = rewrite_document(html, &rewriter()).unwrap();
        assert!(out.contains(r#"href="http://[bad""#));
        assert!(out.contains("url=https%3A%2F%2Fsite.example%2Fok"));
    }
}
