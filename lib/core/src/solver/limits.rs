use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

/// Wall-clock and cancellation limits for `solve` calls.
///
/// When a limit is hit the solver returns [`SolveResponse::Unknown`](super::SolveResponse::Unknown).
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub deadline: Option<Instant>,
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub const fn unlimited() -> Self {
        Self {
            deadline: None,
            interrupt: None,
        }
    }
}
