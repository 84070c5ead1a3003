use std::sync::atomic::{AtomicBool, Ordering};

use backend_domain::JobKind;

/// Non-reentrant guard for one job. A tick that cannot enter is skipped.
#[derive(Debug, Default)]
pub struct JobGate {
    busy: AtomicBool,
}

impl JobGate {
    pub fn try_enter(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

pub struct GateGuard<'a> {
    gate: &'a JobGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct JobGates {
    status_transition: JobGate,
    impact_generation: JobGate,
    reminders: JobGate,
}

impl JobGates {
    pub fn gate(&self, kind: JobKind) -> &JobGate {
        match kind {
            JobKind::StatusTransition => &self.status_transition,
            JobKind::ImpactGeneration => &self.impact_generation,
            JobKind::Reminders => &self.reminders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_refused_until_guard_drops() {
        let gate = JobGate::default();
        let guard = gate.try_enter().expect("first entry");
        assert!(gate.is_busy());
        assert!(gate.try_enter().is_none());
        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_enter().is_some());
    }

    #[test]
    fn gates_are_independent_per_job() {
        let gates = JobGates::default();
        let _status = gates
            .gate(JobKind::StatusTransition)
            .try_enter()
            .expect("status gate");
        assert!(gates.gate(JobKind::ImpactGeneration).try_enter().is_some());
    }
}
