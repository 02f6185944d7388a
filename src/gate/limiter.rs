//! Connection admission gate with per-peer tracking.
//!
//! Three checks run in order on every attempt, short-circuiting on the
//! first failure: total concurrent connections, attempt rate per address,
//! concurrent connections per address. All state lives behind a single
//! mutex; `total_active` must always equal the sum of per-peer active
//! counts, and that invariant only holds if every read and mutation goes
//! through the same critical section.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::schema::GateConfig;
use crate::gate::clock::{Clock, SystemClock};

/// Per-address state, created lazily on the first attempt from that address.
struct PeerState {
    /// Admitted and not yet released connections.
    active_connections: u32,
    /// Attempts counted in the current rate window.
    attempt_count: u32,
    /// Start of the current rate window. Refreshed on every attempt.
    window_start: Instant,
}

/// Everything guarded by the gate's mutex.
struct GateInner {
    peers: HashMap<IpAddr, PeerState>,
    /// Always equals the sum of `active_connections` across `peers`.
    total_active: u32,
    max_connections: Option<u32>,
    max_connections_per_addr: Option<u32>,
    max_attempts_per_window: Option<u32>,
    window: Duration,
}

/// Admission-control gate for incoming connections.
///
/// The hosting server calls [`try_admit`](Self::try_admit) before accepting
/// each connection and [`release`](Self::release) exactly once when an
/// admitted connection closes. Rejected attempts must not be released.
///
/// Limits of `None` are unlimited. Defaults match a small public server:
/// 500 total connections, 5 per address, 5 attempts per 5-second window.
///
/// # Window semantics
///
/// The rate window is a sliding quiet-period detector, not a fixed bucket:
/// every attempt moves `window_start` to now, whether or not the window had
/// expired. The attempt count therefore only resets after a gap longer than
/// the window duration with no attempts at all from that address. A peer
/// retrying just under the window duration apart stays rate-limited
/// indefinitely.
pub struct ConnectionGate {
    inner: Mutex<GateInner>,
    clock: Arc<dyn Clock>,
}

impl ConnectionGate {
    /// Create a gate with default limits and the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a gate with default limits and an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(GateInner {
                peers: HashMap::new(),
                total_active: 0,
                max_connections: Some(500),
                max_connections_per_addr: Some(5),
                max_attempts_per_window: Some(5),
                window: Duration::from_secs(5),
            }),
            clock,
        }
    }

    /// Create a gate from a loaded configuration.
    pub fn from_config(config: &GateConfig) -> Self {
        let gate = Self::new();
        gate.apply_config(config);
        gate
    }

    /// Set the two capacity ceilings. `None` disables a limit.
    ///
    /// Takes the same lock as admission checks, so calling it under live
    /// traffic is safe; in-flight connections are never evicted, only new
    /// attempts see the new limits.
    pub fn set_limits(&self, max_connections: Option<u32>, max_connections_per_addr: Option<u32>) {
        let mut inner = self.inner.lock().expect("gate mutex poisoned");
        inner.max_connections = max_connections;
        inner.max_connections_per_addr = max_connections_per_addr;
    }

    /// Apply all four limit parameters from a configuration.
    pub fn apply_config(&self, config: &GateConfig) {
        let mut inner = self.inner.lock().expect("gate mutex poisoned");
        inner.max_connections = config.max_connections_limit();
        inner.max_connections_per_addr = config.max_connections_per_addr_limit();
        inner.max_attempts_per_window = config.max_attempts_per_window_limit();
        inner.window = config.window();
    }

    /// Decide whether a connection attempt from `addr` may proceed.
    ///
    /// Returns `false` if any limit would be exceeded; the caller must then
    /// refuse the connection and must not call [`release`](Self::release)
    /// for it. On `true` the attempt is counted and a slot is held until
    /// released.
    pub fn try_admit(&self, addr: IpAddr) -> bool {
        let mut inner = self.inner.lock().expect("gate mutex poisoned");
        let inner = &mut *inner;
        let now = self.clock.now();

        if let Some(max) = inner.max_connections {
            if inner.total_active >= max {
                tracing::warn!(
                    peer = %addr,
                    total_active = inner.total_active,
                    "Global connection limit reached"
                );
                return false;
            }
        }

        let window = inner.window;
        let state = inner.peers.entry(addr).or_insert_with(|| PeerState {
            active_connections: 0,
            attempt_count: 0,
            window_start: now,
        });

        if now.duration_since(state.window_start) > window {
            state.attempt_count = 0;
        }
        // Refreshed on every attempt: the count only resets after a quiet
        // gap longer than the full window.
        state.window_start = now;

        if let Some(max) = inner.max_attempts_per_window {
            if state.attempt_count >= max {
                tracing::warn!(
                    peer = %addr,
                    attempts = state.attempt_count,
                    "Attempt rate limit reached"
                );
                return false;
            }
        }

        if let Some(max) = inner.max_connections_per_addr {
            if state.active_connections >= max {
                tracing::warn!(
                    peer = %addr,
                    active = state.active_connections,
                    "Per-address connection limit reached"
                );
                return false;
            }
        }

        state.attempt_count += 1;
        state.active_connections += 1;
        inner.total_active += 1;

        tracing::debug!(
            peer = %addr,
            total_active = inner.total_active,
            "Connection admitted"
        );
        true
    }

    /// Release one admitted connection from `addr`.
    ///
    /// Unknown addresses and excess releases are no-ops; counts never go
    /// negative. The peer's entry is dropped once both its active and
    /// attempt counts are back to zero.
    pub fn release(&self, addr: IpAddr) {
        let mut inner = self.inner.lock().expect("gate mutex poisoned");
        let inner = &mut *inner;

        let idle = match inner.peers.get_mut(&addr) {
            None => return,
            Some(state) => {
                if state.active_connections > 0 {
                    state.active_connections -= 1;
                    inner.total_active -= 1;
                }
                state.active_connections == 0 && state.attempt_count == 0
            }
        };

        if idle {
            inner.peers.remove(&addr);
        }

        tracing::trace!(
            peer = %addr,
            total_active = inner.total_active,
            "Connection released"
        );
    }

    /// Drop all peer state and zero the active count.
    ///
    /// Meant for tests and full reloads. Connections admitted before the
    /// reset still hold their sockets but are no longer counted.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().expect("gate mutex poisoned");
        inner.peers.clear();
        inner.total_active = 0;
    }

    /// Current count of admitted, not yet released connections.
    pub fn active_connections(&self) -> u32 {
        self.inner.lock().expect("gate mutex poisoned").total_active
    }

    /// Number of addresses currently holding state in the gate.
    pub fn tracked_peers(&self) -> usize {
        self.inner.lock().expect("gate mutex poisoned").peers.len()
    }
}

impl Default for ConnectionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().expect("gate mutex poisoned");
        f.debug_struct("ConnectionGate")
            .field("total_active", &inner.total_active)
            .field("tracked_peers", &inner.peers.len())
            .finish_non_exhaustive()
    }
}
