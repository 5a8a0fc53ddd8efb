//! Per-application client context.
//!
//! Holds the request cache and navigation timing table that would otherwise
//! be module-level globals. Build one at startup, share it by reference or
//! `Arc`, and call [`ClientContext::clear`] to reset it.

use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);
pub const MAX_RECENT_ROUTES: usize = 10;
pub const SLOW_NAVIGATION: Duration = Duration::from_secs(2);

struct CachedResponse {
    value: Value,
    stored_at: Instant,
}

// Keyed cache of JSON responses with a fixed time-to-live.
pub struct RequestCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl RequestCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().ok()?;
        let lookup = entries
            .get(key)
            .map(|cached| (cached.stored_at.elapsed() < self.ttl, cached.value.clone()));
        match lookup {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, cached| cached.stored_at.elapsed() < ttl);
            entries.insert(
                key.into(),
                CachedResponse {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// One completed navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteTiming {
    pub route: String,
    pub duration: Duration,
}

// Aggregate view over recorded navigations.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteMetrics {
    pub routes: HashMap<String, Duration>,
    pub average: Duration,
    pub slowest: Option<RouteTiming>,
    // Newest first.
    pub recent: Vec<RouteTiming>,
}

#[derive(Default)]
struct TimingState {
    started: Option<(String, Instant)>,
    last_by_route: HashMap<String, Duration>,
    recent: VecDeque<RouteTiming>,
}

#[derive(Default)]
pub struct RouteTimings {
    state: Mutex<TimingState>,
}

impl RouteTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, from: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.started = Some((from.to_string(), Instant::now()));
            debug!(from, "navigation started");
        }
    }

    // Ends the in-flight navigation, if any, and records it under `to`.
    pub fn finish(&self, to: &str) -> Option<Duration> {
        let started = self.state.lock().ok()?.started.take();
        let (_, at) = started?;
        let duration = at.elapsed();
        self.record(to, duration);
        Some(duration)
    }

    pub fn record(&self, route: &str, duration: Duration) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.last_by_route.insert(route.to_string(), duration);
        state.recent.push_front(RouteTiming {
            route: route.to_string(),
            duration,
        });
        state.recent.truncate(MAX_RECENT_ROUTES);

        if duration > SLOW_NAVIGATION {
            warn!(route, duration_ms = duration.as_millis() as u64, "slow navigation");
        } else {
            debug!(route, duration_ms = duration.as_millis() as u64, "navigation finished");
        }
    }

    pub fn metrics(&self) -> RouteMetrics {
        let Ok(state) = self.state.lock() else {
            return RouteMetrics {
                routes: HashMap::new(),
                average: Duration::ZERO,
                slowest: None,
                recent: Vec::new(),
            };
        };

        let count = state.last_by_route.len() as u32;
        let total: Duration = state.last_by_route.values().sum();
        let average = if count == 0 { Duration::ZERO } else { total / count };
        let slowest = state
            .last_by_route
            .iter()
            .max_by_key(|(_, duration)| **duration)
            .map(|(route, duration)| RouteTiming {
                route: route.clone(),
                duration: *duration,
            });

        RouteMetrics {
            routes: state.last_by_route.clone(),
            average,
            slowest,
            recent: state.recent.iter().cloned().collect(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = TimingState::default();
        }
    }
}

pub struct ClientContext {
    pub cache: RequestCache,
    pub timings: RouteTimings,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ClientContext {
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            cache: RequestCache::new(cache_ttl),
            timings: RouteTimings::new(),
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
        self.timings.clear();
    }
}
