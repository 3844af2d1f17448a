// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content classification
//!
//! Selects the rewrite pipeline from the declared content type of an
//! upstream response. Pure function, case-insensitive substring match.

/// Rewrite pipeline selected for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// HTML: URL rewriting plus script/style injection
    Html,
    /// CSS: `url()` rewriting, status preserved
    Css,
    /// JavaScript: pass-through today, reserved extension point
    Js,
    /// Everything else: bytes, status, and content type untouched
    Binary,
}

impl ContentKind {
    /// Classify a declared content type
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(ct) = content_type else {
            return ContentKind::Binary;
        };
        let ct = ct.to_ascii_lowercase();
        if ct.contains("text/html") {
            ContentKind::Html
        } else if ct.contains("text/css") {
            ContentKind::Css
        } else if ct.contains("javascript") || ct.contains("application/x-javascript") {
            ContentKind::Js
        } else {
            ContentKind::Binary
        }
    }

    /// Check if this kind is rewritten as text
    pub fn is_rewritten(&self) -> bool {
        matches!(self, ContentKind::Html | ContentKind::Css)
    }
}
