//! # Per-Tenant Rate Limiting
//!
//! Fixed-window operation counters keyed by `(tenant, operation)`. The
//! limiter is constructed once and passed into the orchestration layer by
//! dependency; its lifecycle is the process lifetime, and window rollover
//! is the only mutation path.
//!
//! Window arithmetic reads the injected [`Clock`], so tests can cross a
//! window boundary without sleeping.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use veil_core::{Clock, TenantId};

/// The operation classes with independent budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Credential issuance.
    Issue,
    /// Credential or presentation verification.
    Verify,
    /// Presentation derivation.
    Present,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::Issue => "issue",
            Operation::Verify => "verify",
            Operation::Present => "present",
        };
        f.write_str(s)
    }
}

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum operations per window.
    pub max_operations: u64,
    /// Window duration in seconds.
    pub window_secs: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_operations: 100,
            window_secs: 60,
        }
    }
}

/// Per-key window state.
#[derive(Debug, Clone)]
struct WindowState {
    count: u64,
    window_start: DateTime<Utc>,
}

/// Shared rate limiter.
///
/// Counter reads and increments each take one short, non-blocking
/// critical section on the key map; no lock is held across I/O.
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<(TenantId, Operation), WindowState>>,
}

impl RateLimiter {
    /// Create a limiter with the given config and clock.
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Whether `tenant` may perform `operation` right now.
    ///
    /// Does not consume budget; pair with [`RateLimiter::record_operation`]
    /// once the guarded operation proceeds.
    pub fn is_allowed(&self, tenant: TenantId, operation: Operation) -> bool {
        let now = self.clock.now_utc();
        let mut windows = self.windows.lock();
        let state = Self::rolled_over(&mut windows, (tenant, operation), now, &self.config);
        state.count < self.config.max_operations
    }

    /// Count one performed operation against the tenant's budget.
    pub fn record_operation(&self, tenant: TenantId, operation: Operation) {
        let now = self.clock.now_utc();
        let mut windows = self.windows.lock();
        let state = Self::rolled_over(&mut windows, (tenant, operation), now, &self.config);
        state.count += 1;
    }

    /// Fetch the window for `key`, resetting it if it has elapsed.
    fn rolled_over<'a>(
        windows: &'a mut HashMap<(TenantId, Operation), WindowState>,
        key: (TenantId, Operation),
        now: DateTime<Utc>,
        config: &RateLimitConfig,
    ) -> &'a mut WindowState {
        let state = windows.entry(key).or_insert(WindowState {
            count: 0,
            window_start: now,
        });
        if (now - state.window_start).num_seconds() >= config.window_secs {
            state.count = 0;
            state.window_start = now;
        }
        state
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("tracked_keys", &self.windows.lock().len())
            .finish()
    }
}
