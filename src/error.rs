// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the Portico proxy
//!
//! Network-level failures are kept distinct from upstream protocol
//! problems so the HTTP boundary can map them to the right responses.

use thiserror::Error;

/// Result type alias for Portico operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Portico proxy
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client failure (building the client, reading a body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Upstream could not be reached at the network level
    /// (DNS, connection refused, timeout). Not retried.
    #[error("Upstream unreachable: {url}: {reason}")]
    UpstreamUnreachable { url: String, reason: String },

    /// Upstream answered but the response could not be processed
    /// (unparsable redirect location, bad header values)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// HTML could not be parsed or re-serialized
    #[error("HTML rewrite error: {0}")]
    HtmlRewrite(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an unreachable-upstream error
    pub fn unreachable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UpstreamUnreachable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an upstream processing error
    pub fn upstream<S: Into<String>>(msg: S) -> Self {
        Error::Upstream(msg.into())
    }

    /// Create an HTML rewrite error
    pub fn rewrite<S: Into<String>>(msg: S) -> Self {
        Error::HtmlRewrite(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a network-level error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::UpstreamUnreachable { .. } | Error::Http(_))
    }

    /// Get the target URL if the error carries one
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::UpstreamUnreachable { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
