// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session cookie storage
//!
//! Upstream sites are fetched server-side, so their cookies never reach the
//! embedding browser. Each logical client gets its own [`SessionStore`] that
//! accumulates `Set-Cookie` pairs and replays them on every outbound request.
//! Only the `name=value` pair is retained; attributes (`Path`, `Expires`,
//! `Secure`, ...) are discarded and nothing expires automatically.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::RwLock;
use rand::RngCore;

/// A single session cookie, reduced to its `name=value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a `Set-Cookie` header value, keeping only the leading pair.
    ///
    /// Everything after the first `;` is dropped. Headers without a `=`
    /// separator are discarded.
    pub fn parse(header: &str) -> Option<Self> {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        if name.is_empty() {
            return None;
        }
        Some(Cookie::new(name, value))
    }

    /// Convert to `Cookie` request-header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Ordered cookie storage for one logical client.
///
/// At most one entry per cookie name: a newly recorded `Set-Cookie` for an
/// existing name replaces the entry in place of appending. Concurrent
/// writers to the same name race and the last writer wins; that is the
/// accepted consistency policy, matching what a shared jar gives a browser.
#[derive(Debug, Default)]
pub struct SessionStore {
    cookies: RwLock<Vec<Cookie>>,
}

impl SessionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a batch of `Set-Cookie` header values
    pub fn record<'a>(&self, headers: impl IntoIterator<Item = &'a str>) {
        for header in headers {
            if let Some(cookie) = Cookie::parse(header) {
                let mut cookies = self.cookies.write();
                cookies.retain(|c| c.name != cookie.name);
                cookies.push(cookie);
            }
        }
    }

    /// Serialize all pairs into a `Cookie` request-header value,
    /// joined with `"; "` in insertion order
    pub fn serialize(&self) -> String {
        self.cookies
            .read()
            .iter()
            .map(Cookie::to_header_value)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Cookie` header value, or `None` when the store is empty
    pub fn cookie_header(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.serialize())
        }
    }

    /// Get the value of a cookie by name
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies
            .read()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.clone())
    }

    /// Number of stored cookies
    pub fn len(&self) -> usize {
        self.cookies.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.cookies.read().is_empty()
    }
}

struct SessionEntry {
    store: Arc<SessionStore>,
    last_seen: Instant,
}

/// Session stores keyed by an opaque per-browser identifier.
///
/// The identifier travels in a proxy-owned cookie and is never forwarded
/// upstream, so each browser keeps its own upstream cookie identity.
/// Entries idle for longer than the configured TTL are evicted lazily on
/// the next access.
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    idle_ttl: Duration,
}

/// Default idle lifetime for a client session
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

impl SessionRegistry {
    /// Create a registry with the default idle TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    /// Create a registry with a custom idle TTL
    pub fn with_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    /// Generate a fresh opaque session identifier (128-bit hex token)
    pub fn new_id(&self) -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Fetch the store for an identifier, creating it on first use
    /// and refreshing its idle clock
    pub fn session(&self, id: &str) -> Arc<SessionStore> {
        self.evict_idle();
        let mut entry = self
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| SessionEntry {
                store: Arc::new(SessionStore::new()),
                last_seen: Instant::now(),
            });
        entry.last_seen = Instant::now();
        entry.store.clone()
    }

    /// Drop sessions idle for longer than the TTL
    fn evict_idle(&self) {
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() <= self.idle_ttl);
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
