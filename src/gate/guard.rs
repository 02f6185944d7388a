//! Release-on-drop handle for admitted connections.
//!
//! The bare `try_admit`/`release` pair requires the caller to pair every
//! admission with exactly one release. Holding an [`AdmissionGuard`] for
//! the connection's lifetime instead makes the release automatic, so a
//! handler that panics or returns early cannot leak a slot.

use std::net::IpAddr;
use std::sync::Arc;

use crate::gate::limiter::ConnectionGate;

impl ConnectionGate {
    /// Like [`try_admit`](Self::try_admit), but on success returns a guard
    /// that releases the admission when dropped.
    pub fn try_admit_guarded(self: &Arc<Self>, addr: IpAddr) -> Option<AdmissionGuard> {
        if self.try_admit(addr) {
            Some(AdmissionGuard {
                gate: Arc::clone(self),
                addr,
            })
        } else {
            None
        }
    }
}

/// Holds one admitted connection slot; released on drop.
pub struct AdmissionGuard {
    gate: Arc<ConnectionGate>,
    addr: IpAddr,
}

impl AdmissionGuard {
    /// The remote address this admission belongs to.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }
}

impl Drop for AdmissionGuard {
    fn drop(&mut self) {
        self.gate.release(self.addr);
    }
}

impl std::fmt::Debug for AdmissionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionGuard")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_on_drop() {
        let gate = Arc::new(ConnectionGate::new());
        let addr = IpAddr::from([192, 168, 1, 1]);

        let guard = gate.try_admit_guarded(addr).expect("admission");
        assert_eq!(guard.addr(), addr);
        assert_eq!(gate.active_connections(), 1);

        drop(guard);
        assert_eq!(gate.active_connections(), 0);
    }

    #[test]
    fn rejected_admission_returns_no_guard() {
        let gate = Arc::new(ConnectionGate::new());
        gate.set_limits(Some(1), None);
        let addr = IpAddr::from([192, 168, 1, 2]);

        let _held = gate.try_admit_guarded(addr).expect("first admission");
        assert!(gate.try_admit_guarded(addr).is_none());
        assert_eq!(gate.active_connections(), 1);
    }
}
