// SPDX-License-Identifier: Apache-2.0

use druginsight_api::ParamBounds;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub default_limit: u32,
    pub max_limit: u32,
    pub default_days_back: u32,
    pub max_days_back: u32,
    /// Outer bound on the whole store round trip; expiry maps to 502.
    pub request_timeout: Duration,
    /// Per-statement SQLite progress-handler deadline.
    pub sql_timeout: Duration,
    pub slow_query_threshold: Duration,
    pub enable_response_cache: bool,
    pub response_cache_ttl: Duration,
    pub response_cache_max_entries: usize,
    /// When set, requests must present a listed `x-api-key`, or (with an
    /// empty allowlist) a non-empty bearer token verified upstream.
    pub require_api_key: bool,
    pub allowed_api_keys: Vec<String>,
    pub max_connections: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            default_days_back: 30,
            max_days_back: 365,
            request_timeout: Duration::from_secs(5),
            sql_timeout: Duration::from_millis(800),
            slow_query_threshold: Duration::from_millis(200),
            enable_response_cache: true,
            response_cache_ttl: Duration::from_secs(900),
            response_cache_max_entries: 256,
            require_api_key: false,
            allowed_api_keys: Vec::new(),
            max_connections: 8,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn param_bounds(&self) -> ParamBounds {
        ParamBounds {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
            default_days_back: self.default_days_back,
            max_days_back: self.max_days_back,
        }
    }
}
