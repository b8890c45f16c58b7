//! Batch runner: checks a suite of examples and compares against expectations.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use itertools::Itertools;
use log::{info, warn};

use crate::driver::Report;
use crate::error::*;
use crate::example::ExampleSpec;
use crate::theory::{TheoryRegistry, Translation};

/// Result of one example.
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub theory: String,
    pub expectation: Option<bool>,
    pub result: Result<Report>,
}

impl Outcome {
    /// `None` without an expectation. Errors never meet one.
    pub fn passed(&self) -> Option<bool> {
        let expected = self.expectation?;
        Some(match &self.result {
            Ok(report) => report.has_countermodel() == expected,
            Err(_) => false,
        })
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = match &self.result {
            Ok(report) => format!("{} ({:.3} s)", report.verdict, report.elapsed.as_secs_f64()),
            Err(e) if e.is_timeout() => "timeout".to_string(),
            Err(e) => format!("error: {}", e),
        };
        let mark = match self.passed() {
            Some(true) => "PASS",
            Some(false) => "FAIL",
            None => "----",
        };
        write!(f, "[{}] {} ({}): {}", mark, self.name, self.theory, status)
    }
}

/// Runs examples against theories taken from a registry.
#[derive(Debug)]
pub struct Runner<'r> {
    registry: &'r TheoryRegistry,
    translation: Option<Translation>,
    jobs: usize,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<'r> Runner<'r> {
    pub fn new(registry: &'r TheoryRegistry) -> Self {
        Self {
            registry,
            translation: None,
            jobs: 1,
            interrupt: None,
        }
    }

    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Number of examples checked in parallel.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Flag that cancels in-flight solver calls when set.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn run_one(&self, theory: &str, name: &str, spec: &ExampleSpec) -> Outcome {
        let expectation = spec.settings.get("expectation").and_then(|v| v.as_bool());
        let result = self.registry.get(theory).and_then(|theory| {
            let example = spec.compile(name, self.translation.as_ref())?;
            theory.check(&example.problem, self.interrupt.clone())
        });
        let outcome = Outcome {
            name: name.to_string(),
            theory: theory.to_string(),
            expectation,
            result,
        };
        match outcome.passed() {
            Some(false) => warn!("{}", outcome),
            _ => info!("{}", outcome),
        }
        outcome
    }

    /// Outcomes are returned in the order of `examples`.
    pub fn run(&self, theory: &str, examples: &[(String, ExampleSpec)]) -> Vec<Outcome> {
        if self.jobs == 1 || examples.len() <= 1 {
            return examples
                .iter()
                .map(|(name, spec)| self.run_one(theory, name, spec))
                .collect();
        }

        let next = AtomicUsize::new(0);
        let mut outcomes = thread::scope(|scope| {
            let workers = (0..self.jobs.min(examples.len()))
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        loop {
                            let i = next.fetch_add(1, Ordering::Relaxed);
                            match examples.get(i) {
                                Some((name, spec)) => done.push((i, self.run_one(theory, name, spec))),
                                None => break,
                            }
                        }
                        done
                    })
                })
                .collect_vec();
            workers
                .into_iter()
                .flat_map(|worker| match worker.join() {
                    Ok(done) => done,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect_vec()
        });
        outcomes.sort_by_key(|(i, _)| *i);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

/// Counts of passed, failed and unchecked outcomes.
pub fn summarize(outcomes: &[Outcome]) -> (usize, usize, usize) {
    outcomes.iter().fold((0, 0, 0), |(pass, fail, none), o| match o.passed() {
        Some(true) => (pass + 1, fail, none),
        Some(false) => (pass, fail + 1, none),
        None => (pass, fail, none + 1),
    })
}
