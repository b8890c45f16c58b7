use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Resource limits for a single `solve` call.
///
/// The search loop polls [`Budget::exhausted`] cooperatively; once it reports
/// `true` the call returns [`SolveResult::Unknown`](crate::solver::SolveResult::Unknown)
/// and leaves the solver at decision level zero.
#[derive(Debug, Clone, Default)]
pub struct Budget {
    pub deadline: Option<Instant>,
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl Budget {
    pub const fn unlimited() -> Self {
        Self {
            deadline: None,
            interrupt: None,
        }
    }

    pub fn past_deadline(&self) -> bool {
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    pub fn interrupted(&self) -> bool {
        self.interrupt.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    pub fn exhausted(&self) -> bool {
        self.interrupted() || self.past_deadline()
    }
}
