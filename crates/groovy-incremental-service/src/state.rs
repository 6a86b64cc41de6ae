//! Advisory per-logical-name lifecycle bookkeeping.
//!
//! This is observational only: the cache and writer slots in
//! [`crate::IncrementalCompilationService`] remain the source of truth for
//! what is actually cached. `ModuleState` exists so tests and diagnostics
//! can assert on the lifecycle a name has gone through, in the spirit of
//! this workspace's
//! other lifecycle state machines, scaled down to the three states the
//! facade actually distinguishes.
use groovy_phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Absent,
    InFlight,
    CachedAtPhase(Phase),
}

impl ModuleState {
    pub fn is_cached(&self) -> bool {
        matches!(self, ModuleState::CachedAtPhase(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_at_phase_reports_as_cached() {
        assert!(ModuleState::CachedAtPhase(Phase::Parsing).is_cached());
        assert!(!ModuleState::Absent.is_cached());
        assert!(!ModuleState::InFlight.is_cached());
    }
}
