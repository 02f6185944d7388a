//! Connection admission control for network servers.
//!
//! Decides at accept time whether a new connection may proceed, based on
//! three independent limits: total concurrent connections, concurrent
//! connections per remote address, and attempt rate per remote address
//! within a sliding window. The hosting server owns the listener and the
//! sockets; this crate only answers admit/reject and tracks the counts.
//!
//! ```
//! use std::net::IpAddr;
//! use admission_gate::ConnectionGate;
//!
//! let gate = ConnectionGate::new();
//! let peer: IpAddr = "203.0.113.7".parse().unwrap();
//!
//! if gate.try_admit(peer) {
//!     // serve the connection, then:
//!     gate.release(peer);
//! } else {
//!     // refuse the connection
//! }
//! ```
//!
//! State is in-memory only and resets on restart.

pub mod config;
pub mod gate;

pub use config::loader::{load_config, ConfigError};
pub use config::schema::GateConfig;
pub use gate::clock::{Clock, ManualClock, SystemClock};
pub use gate::guard::AdmissionGuard;
pub use gate::limiter::ConnectionGate;
