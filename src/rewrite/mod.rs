// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content rewriting
//!
//! Classifies fetched content, rewrites embedded references (HTML
//! attributes, CSS `url()` tokens) to the proxy-routed form, and
//! generates the runtime interceptor script injected into HTML.

mod classify;
mod css;
mod html;
mod shim;
mod urls;

pub use classify::ContentKind;
pub use css::rewrite_css;
pub use html::rewrite_document;
pub use shim::shim_script;
pub use urls::{ProxyBase, RefKind, UrlRewriter, PROXY_ROUTE_PATH};
