use tracing::debug;

use crate::options::Options;

/// Cap on the learnt clauses kept between database reductions.
///
/// It starts at a fraction of the problem clauses and is raised by
/// `learntsize_inc` each time a countdown of conflicts runs out. The countdown
/// itself stretches by `learntsize_adjust_inc` after every raise.
#[derive(Debug)]
pub struct LearntLimit {
    factor: f64,
    growth: f64,
    interval_start: f64,
    interval_growth: f64,
    max_learnts: f64,
    interval: f64,
    countdown: u64,
}

impl LearntLimit {
    pub fn new(options: &Options) -> Self {
        Self {
            factor: options.learntsize_factor,
            growth: options.learntsize_inc,
            interval_start: options.learntsize_adjust_start,
            interval_growth: options.learntsize_adjust_inc,
            max_learnts: 0.0,
            interval: 0.0,
            countdown: 0,
        }
    }

    /// Learnt clauses allowed while `num_assigns` literals are on the trail.
    pub fn limit(&self, num_assigns: usize) -> usize {
        self.max_learnts as usize + num_assigns
    }

    /// Start over at the beginning of a `solve` call.
    pub fn start(&mut self, num_clauses: usize) {
        // Floor for small problems
        self.max_learnts = (num_clauses as f64 * self.factor).max(1000.0);
        self.interval = self.interval_start;
        self.countdown = self.interval as u64;
    }

    /// Called once per conflict. Returns `true` when the cap was just raised.
    pub fn on_conflict(&mut self) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return false;
        }
        self.max_learnts *= self.growth;
        self.interval *= self.interval_growth;
        self.countdown = self.interval as u64;
        debug!("Learnt clause cap raised to {}, next raise in {} conflicts", self.max_learnts as u64, self.countdown);
        true
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_cap_grows_on_schedule() {
        let options = Options {
            learntsize_factor: 0.5,
            learntsize_inc: 2.0,
            learntsize_adjust_start: 3.0,
            learntsize_adjust_inc: 2.0,
            ..Options::default()
        };
        let mut limit = LearntLimit::new(&options);
        limit.start(4000);
        assert_eq!(limit.limit(10), 2010);

        let raises = (0..9).map(|_| limit.on_conflict()).collect::<Vec<_>>();
        // Raised after 3 conflicts, then after 6 more
        assert_eq!(raises.iter().filter(|&&r| r).count(), 2);
        assert!(raises[2] && raises[8]);
        assert_eq!(limit.limit(0), 8000);
    }

    #[test]
    fn test_small_problems_keep_a_floor() {
        let mut limit = LearntLimit::new(&Options::default());
        limit.start(30);
        assert_eq!(limit.limit(0), 1000);
    }
}
