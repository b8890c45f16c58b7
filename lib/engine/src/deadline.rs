//! Wall-clock budget shared by every stage of one check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use modal_nexus_core::solver::SearchLimits;

use crate::error::*;

/// Started once per check. Encoding polls it between expensive steps, and
/// every solver call runs under the same absolute deadline.
#[derive(Debug, Clone)]
pub struct Deadline {
    max_time: Duration,
    at: Option<Instant>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Deadline {
    pub fn start(max_time: Duration, interrupt: Option<Arc<AtomicBool>>) -> Self {
        Self {
            max_time,
            at: Instant::now().checked_add(max_time),
            interrupt,
        }
    }

    pub fn none() -> Self {
        Self {
            max_time: Duration::MAX,
            at: None,
            interrupt: None,
        }
    }

    pub fn is_over(&self) -> bool {
        let interrupted = self.interrupt.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed));
        interrupted || self.at.map_or(false, |at| Instant::now() >= at)
    }

    /// `Timeout` once the budget is spent.
    pub fn check(&self) -> Result<()> {
        if self.is_over() {
            Err(self.timeout())
        } else {
            Ok(())
        }
    }

    /// Solver limits ending at the same instant as this deadline.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            deadline: self.at,
            interrupt: self.interrupt.clone(),
        }
    }

    pub fn timeout(&self) -> CheckError {
        CheckError::Timeout {
            max_time: self.max_time.as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_spent_budget() {
        let deadline = Deadline::start(Duration::ZERO, None);
        assert!(deadline.is_over());
        assert!(matches!(deadline.check(), Err(CheckError::Timeout { .. })));
        assert!(deadline.limits().deadline.is_some());
    }

    #[test]
    fn test_interrupt_ends_budget() {
        let flag = Arc::new(AtomicBool::new(false));
        let deadline = Deadline::start(Duration::from_secs(60), Some(Arc::clone(&flag)));
        assert!(deadline.check().is_ok());
        flag.store(true, Ordering::Relaxed);
        assert!(deadline.check().is_err());
    }

    #[test]
    fn test_no_deadline() {
        let deadline = Deadline::none();
        assert!(!deadline.is_over());
        assert!(deadline.limits().deadline.is_none());
        // Far beyond what `Instant` can represent
        assert!(Deadline::start(Duration::MAX, None).check().is_ok());
    }
}
