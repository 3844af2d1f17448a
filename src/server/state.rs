// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared handler state.

use std::sync::Arc;

use crate::proxy::ProxyService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The proxy service (session registry included).
    pub service: Arc<ProxyService>,
}

impl AppState {
    /// Creates state around a proxy service.
    pub fn new(service: ProxyService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
