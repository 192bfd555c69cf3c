//! Endpoint health bookkeeping and round-robin selection

use parking_lot::RwLock;
use tracing::{debug, warn};

/// Consecutive failures before an endpoint is taken out of rotation
pub const FAILURE_THRESHOLD: u32 = 3;

/// Backend endpoint status
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub url: String,
    pub healthy: bool,
    pub consecutive_failures: u32,
}

impl Endpoint {
    pub fn new(url: String) -> Self {
        Self {
            url,
            healthy: true,
            consecutive_failures: 0,
        }
    }

    pub fn mark_healthy(&mut self) {
        self.healthy = true;
        self.consecutive_failures = 0;
    }

    pub fn mark_unhealthy(&mut self) {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= FAILURE_THRESHOLD {
            self.healthy = false;
        }
    }
}

/// The endpoints of one backend
#[derive(Debug)]
pub struct EndpointPool {
    backend: String,
    endpoints: RwLock<Vec<Endpoint>>,
    next: RwLock<usize>,
}

impl EndpointPool {
    pub fn new(backend: &str, urls: &[String]) -> Self {
        Self {
            backend: backend.to_string(),
            endpoints: RwLock::new(urls.iter().cloned().map(Endpoint::new).collect()),
            next: RwLock::new(0),
        }
    }

    /// Get the next healthy endpoint
    pub fn next_endpoint(&self) -> Option<String> {
        let endpoints = self.endpoints.read();
        let healthy: Vec<_> = endpoints.iter().filter(|e| e.healthy).collect();

        if healthy.is_empty() {
            return None;
        }

        let mut index = self.next.write();
        let chosen = healthy[*index % healthy.len()].url.clone();
        *index = (*index + 1) % healthy.len();
        Some(chosen)
    }

    pub fn mark_healthy(&self, url: &str) {
        let mut endpoints = self.endpoints.write();
        if let Some(endpoint) = endpoints.iter_mut().find(|e| e.url == url) {
            endpoint.mark_healthy();
            debug!(backend = %self.backend, url = %url, "Marked endpoint as healthy");
        }
    }

    pub fn mark_unhealthy(&self, url: &str) {
        let mut endpoints = self.endpoints.write();
        if let Some(endpoint) = endpoints.iter_mut().find(|e| e.url == url) {
            endpoint.mark_unhealthy();
            warn!(
                backend = %self.backend,
                url = %url,
                failures = endpoint.consecutive_failures,
                "Endpoint request failed"
            );
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.endpoints.read().iter().map(|e| e.url.clone()).collect()
    }

    pub fn any_healthy(&self) -> bool {
        self.endpoints.read().iter().any(|e| e.healthy)
    }
}
