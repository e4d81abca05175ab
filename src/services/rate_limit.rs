//! Fixed window rate limiting with bounded wait queues.

use crate::{
    config::{API_POLICY, GLOBAL_POLICY, RateLimitConfig, RateLimitPolicy, STRICT_POLICY},
    error::ApiError,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
    time::{Duration, Instant},
};

/// Key count above which idle windows are pruned on insert
const PRUNE_THRESHOLD: usize = 1024;

/// Outcome of a single policy check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// A permit in the current window was granted
    Admitted,
    /// A permit in the next window was reserved; proceed after `wait`
    Queued { wait: Duration },
    /// No permit and no queue room left
    Rejected { retry_after: Duration },
}

/// Per-key window bookkeeping
#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    /// Permits handed out in the current window
    granted: usize,
    /// Permits reserved in the next window
    queued: usize,
}

impl WindowState {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            granted: 0,
            queued: 0,
        }
    }

    /// Advance to the window containing `now`.
    ///
    /// Reservations made for the next window count against it when exactly
    /// one window has passed; they have already been served otherwise.
    fn roll(&mut self, now: Instant, window: Duration) {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < window {
            return;
        }

        let windows_passed = elapsed.as_nanos() / window.as_nanos();
        let into_current = elapsed.as_nanos() % window.as_nanos();
        self.window_start = now - Duration::from_nanos(into_current as u64);
        self.granted = if windows_passed == 1 { self.queued } else { 0 };
        self.queued = 0;
    }

    fn is_idle(&self, now: Instant, window: Duration) -> bool {
        window
            .checked_mul(2)
            .is_some_and(|idle_after| now.saturating_duration_since(self.window_start) >= idle_after)
    }
}

/// One named policy applied per client key.
///
/// The key map is read-locked for lookups and write-locked only to insert
/// a new key; each key's counters sit behind their own mutex so callers
/// with different keys never contend on the same counter.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    policy: RateLimitPolicy,
    windows: RwLock<HashMap<String, Arc<Mutex<WindowState>>>>,
}

impl FixedWindowLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: RwLock::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.policy.window_seconds.max(1))
    }

    fn state_for(&self, key: &str, now: Instant) -> Arc<Mutex<WindowState>> {
        {
            let windows = self.windows.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(state) = windows.get(key) {
                return state.clone();
            }
        }

        let mut windows = self.windows.write().unwrap_or_else(PoisonError::into_inner);
        if windows.len() >= PRUNE_THRESHOLD {
            let window = self.window();
            windows.retain(|_, state| {
                !state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_idle(now, window)
            });
        }

        windows
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(WindowState::new(now))))
            .clone()
    }

    /// Check `key` against the policy at instant `now`
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let window = self.window();
        let state = self.state_for(key, now);
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);

        state.roll(now, window);
        // A window reaching past the representable future never ends
        let remaining = state
            .window_start
            .checked_add(window)
            .map_or(window, |window_end| window_end.saturating_duration_since(now));

        if state.granted < self.policy.permit_limit {
            state.granted += 1;
            RateLimitDecision::Admitted
        } else if state.queued < self.policy.queue_limit.min(self.policy.permit_limit) {
            state.queued += 1;
            RateLimitDecision::Queued {
                wait: remaining,
            }
        } else {
            RateLimitDecision::Rejected {
                retry_after: remaining,
            }
        }
    }

    /// Check `key` against the policy now
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Whole seconds until `duration` elapses, never less than one
pub fn retry_after_seconds(duration: Duration) -> u64 {
    let secs = duration
        .as_secs()
        .saturating_add(u64::from(duration.subsec_nanos() > 0));
    secs.max(1)
}

/// Policies guarding a request path, in evaluation order
pub fn policies_for_path(path: &str) -> &'static [&'static str] {
    if path == "/metrics" || path == "/health" || path.starts_with("/health/") {
        &[]
    } else if path.starts_with("/api/analytics/production/") || path == "/api/analytics/sales" {
        &[GLOBAL_POLICY, STRICT_POLICY]
    } else if path == "/weatherforecast" || path == "/api/analytics" {
        &[GLOBAL_POLICY, API_POLICY]
    } else {
        &[GLOBAL_POLICY]
    }
}

/// The three named policies shared by every worker
#[derive(Clone, Debug)]
pub struct RateLimiter {
    enabled: bool,
    global: Arc<FixedWindowLimiter>,
    api: Arc<FixedWindowLimiter>,
    strict: Arc<FixedWindowLimiter>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            global: Arc::new(FixedWindowLimiter::new(config.global)),
            api: Arc::new(FixedWindowLimiter::new(config.api)),
            strict: Arc::new(FixedWindowLimiter::new(config.strict)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a policy limiter by name
    pub fn limiter(&self, policy: &str) -> Option<&FixedWindowLimiter> {
        match policy {
            GLOBAL_POLICY => Some(self.global.as_ref()),
            API_POLICY => Some(self.api.as_ref()),
            STRICT_POLICY => Some(self.strict.as_ref()),
            _ => None,
        }
    }

    /// Run every policy guarding `path` for client `key` at instant `now`.
    ///
    /// Returns how long the caller must wait before proceeding (`None` to
    /// proceed immediately) or the rejection of the first exhausted policy.
    /// Permits taken from earlier policies are not returned on rejection.
    pub fn acquire_at(&self, key: &str, path: &str, now: Instant) -> Result<Option<Duration>, ApiError> {
        if !self.enabled {
            return Ok(None);
        }

        let mut wait: Option<Duration> = None;
        for name in policies_for_path(path) {
            let Some(limiter) = self.limiter(name) else {
                continue;
            };

            match limiter.check_at(key, now) {
                RateLimitDecision::Admitted => {}
                RateLimitDecision::Queued { wait: w } => {
                    wait = Some(wait.map_or(w, |current| current.max(w)));
                }
                RateLimitDecision::Rejected { retry_after } => {
                    return Err(ApiError::rate_limited(
                        *name,
                        retry_after_seconds(retry_after),
                    ));
                }
            }
        }

        Ok(wait)
    }

    /// Run every policy guarding `path` for client `key` now
    pub fn acquire(&self, key: &str, path: &str) -> Result<Option<Duration>, ApiError> {
        self.acquire_at(key, path, Instant::now())
    }
}
