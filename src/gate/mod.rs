//! Admission gate subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming connection attempt:
//!     → limiter.rs try_admit (global cap → rate window → per-address cap)
//!     → caller accepts the socket, or refuses it on false
//!
//! On connection close:
//!     → limiter.rs release (decrement counters, drop idle peer entries)
//!       (or automatic via guard.rs AdmissionGuard drop)
//! ```
//!
//! # Design Decisions
//! - One mutex over the whole state: cross-field invariants
//!   (total vs. per-peer sums) need a single critical section
//! - Sliding quiet-period window: every attempt refreshes the window start
//! - Idle peer entries are removed immediately, not swept later
//! - Time comes from an injected clock so expiry tests never sleep

pub mod clock;
pub mod guard;
pub mod limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::AdmissionGuard;
pub use limiter::ConnectionGate;
