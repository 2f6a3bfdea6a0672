//! Per-client request rate limiting.
//!
//! Each client gets a token bucket sized to the rule's request count and
//! refilled evenly over the rule's period.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::AppState;
use super::routes::detail;

/// Bucket key for requests without peer information.
const UNKNOWN_CLIENT: &str = "unknown";

/// Tracked clients above which idle buckets are swept.
const SWEEP_THRESHOLD: usize = 1024;

/// Allowed requests per period, parsed from e.g. "100/minute".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub requests: u32,
    pub period: Duration,
}

impl RateLimitRule {
    pub fn parse(rule: &str) -> Result<Self, String> {
        let (count, period) = rule
            .split_once('/')
            .ok_or_else(|| format!("expected <count>/<period>, got {:?}", rule))?;

        let requests: u32 = count
            .trim()
            .parse()
            .map_err(|_| format!("invalid request count: {:?}", count))?;
        if requests == 0 {
            return Err("request count must be positive".to_string());
        }

        let period = match period.trim().to_lowercase().as_str() {
            "second" | "seconds" => Duration::from_secs(1),
            "minute" | "minutes" => Duration::from_secs(60),
            "hour" | "hours" => Duration::from_secs(60 * 60),
            "day" | "days" => Duration::from_secs(24 * 60 * 60),
            other => return Err(format!("unknown period: {:?}", other)),
        };

        Ok(Self { requests, period })
    }

    fn refill_per_sec(&self) -> f64 {
        f64::from(self.requests) / self.period.as_secs_f64()
    }
}

struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    /// A bucket untouched for a whole period is back at capacity, the same
    /// state a new client starts in.
    fn is_idle(&self, period: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_update) >= period
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[derive(Default)]
struct Buckets {
    by_client: HashMap<String, TokenBucket>,
    last_sweep: Option<Instant>,
}

/// Token buckets keyed by client.
///
/// Once 1024 or more clients are tracked, buckets idle for a
/// whole period are dropped, at most once per period.
pub struct RateLimiter {
    rule: RateLimitRule,
    buckets: Mutex<Buckets>,
}

impl RateLimiter {
    pub fn new(rule: RateLimitRule) -> Self {
        Self {
            rule,
            buckets: Mutex::new(Buckets::default()),
        }
    }

    pub fn rule(&self) -> RateLimitRule {
        self.rule
    }

    /// Take a token for `key`; false when the client is over its limit.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_client
            .len()
    }

    pub(crate) fn check_at(&self, key: &str, now: Instant) -> bool {
        let capacity = f64::from(self.rule.requests);
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        let period = self.rule.period;
        let sweep_due = buckets
            .last_sweep
            .is_none_or(|last| now.saturating_duration_since(last) >= period);
        if sweep_due && buckets.by_client.len() >= SWEEP_THRESHOLD {
            buckets
                .by_client
                .retain(|_, bucket| !bucket.is_idle(period, now));
            buckets.last_sweep = Some(now);
        }

        buckets
            .by_client
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(capacity, now))
            .try_acquire(capacity, self.rule.refill_per_sec(), now)
    }
}

/// Reject requests over the configured rate with 429.
pub(super) async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(limiter) = state.limiter.as_ref() else {
        return next.run(request).await;
    };

    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    if limiter.check(&client) {
        next.run(request).await
    } else {
        warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
        detail(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")
    }
}
