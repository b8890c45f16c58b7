//! Assembles frame, valuation and goal constraints into one query and runs it.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use tap::Tap;

use formula_parser::{Atom, Formula};
use modal_nexus_core::lit::Lit;
use modal_nexus_core::op::ops::Ops;
use modal_nexus_core::solver::{SolveResponse, SolveStats, Solver};
use modal_nexus_wrappers::simplesat::SimpleSatSolver;

use crate::deadline::Deadline;
use crate::error::*;
use crate::iterate::iterate;
use crate::model::Countermodel;
use crate::settings::Settings;

/// Theory-specific constraint generation, as seen by the driver.
pub trait Encoding: Sized {
    /// Declare the frame and the atom valuations. Formula encoding later
    /// stops with `Timeout` once `deadline` passes.
    fn build<S>(solver: &mut S, settings: &Settings, atoms: &[Atom], deadline: &Deadline) -> Result<Self>
    where
        S: Solver;

    /// Literal for the truth of `formula` at the evaluation point.
    fn truth_at_eval<S>(&mut self, solver: &mut S, formula: &Formula) -> Result<Lit>
    where
        S: Solver;

    /// Literals on which distinct models must differ.
    fn essential(&self) -> Vec<Lit>;

    fn extract<S>(&self, solver: &S) -> Result<Countermodel>
    where
        S: Solver;
}

/// Premises, conclusions and settings of one check, over primitive operators.
#[derive(Debug, Clone)]
pub struct Problem {
    pub premises: Vec<Formula>,
    pub conclusions: Vec<Formula>,
    pub settings: Settings,
}

impl Problem {
    pub fn new(premises: Vec<Formula>, conclusions: Vec<Formula>, settings: Settings) -> Self {
        Self {
            premises,
            conclusions,
            settings,
        }
    }

    pub fn atoms(&self) -> Vec<Atom> {
        self.premises
            .iter()
            .chain(self.conclusions.iter())
            .flat_map(Formula::atoms)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Premises true and some conclusion false at the evaluation point.
    Countermodel,
    /// No countermodel within the bound given by the settings.
    NoCountermodel,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Countermodel => write!(f, "countermodel"),
            Verdict::NoCountermodel => write!(f, "no countermodel"),
        }
    }
}

#[derive(Debug)]
pub struct Report {
    pub verdict: Verdict,
    /// Pairwise distinct models, in the order found.
    pub models: Vec<Countermodel>,
    /// Why iteration stopped short of `iterate` models.
    pub iteration_stop: Option<CheckError>,
    pub num_vars: usize,
    pub num_clauses: usize,
    /// Search effort over every solver call of the check.
    pub stats: SolveStats,
    pub elapsed: Duration,
}

impl Report {
    pub fn has_countermodel(&self) -> bool {
        self.verdict == Verdict::Countermodel
    }
}

/// Check `problem` with a fresh solver.
pub fn check<E>(problem: &Problem, interrupt: Option<Arc<AtomicBool>>) -> Result<Report>
where
    E: Encoding,
{
    check_with::<E, _>(SimpleSatSolver::new(), problem, interrupt)
}

pub fn check_with<E, S>(mut solver: S, problem: &Problem, interrupt: Option<Arc<AtomicBool>>) -> Result<Report>
where
    E: Encoding,
    S: Solver,
{
    let start_time = Instant::now();
    let settings = &problem.settings;
    if settings.n == 0 {
        return InfeasibleFrameSnafu {
            reason: "N = 0 leaves no atomic states",
        }
        .fail();
    }
    // One budget for encoding, every solver call and iteration
    let deadline = Deadline::start(settings.max_time, interrupt);

    let atoms = problem.atoms();
    let mut encoding = E::build(&mut solver, settings, &atoms, &deadline)?;

    let premises = problem
        .premises
        .iter()
        .map(|f| encoding.truth_at_eval(&mut solver, f))
        .collect::<Result<Vec<_>>>()?;
    let conclusions = problem
        .conclusions
        .iter()
        .map(|f| encoding.truth_at_eval(&mut solver, f))
        .collect::<Result<Vec<_>>>()?;
    deadline.check()?;

    // Goal constraints only apply under the activation literal,
    // so that an infeasible frame can be told apart from a valid argument.
    let activation = solver.new_var();
    solver.imply_and(activation, premises);
    if !conclusions.is_empty() {
        solver.imply_or(activation, conclusions.iter().map(|&c| -c));
    }
    let num_vars = solver.num_vars();
    let num_clauses = solver.num_clauses();
    debug!(
        "Encoded {} premises and {} conclusions over {} atoms: {} variables, {} clauses",
        problem.premises.len(),
        problem.conclusions.len(),
        atoms.len(),
        num_vars,
        num_clauses
    );

    solver.set_limits(deadline.limits());
    solver.assume(activation);
    let response = solver.solve().tap(|r| debug!("Goal query: {}", r));

    let mut report = Report {
        verdict: Verdict::NoCountermodel,
        models: Vec::new(),
        iteration_stop: None,
        num_vars,
        num_clauses,
        stats: SolveStats::default(),
        elapsed: Duration::ZERO,
    };

    match response {
        SolveResponse::Sat => {
            let model = encoding.extract(&solver)?;
            model.verify(&problem.premises, &problem.conclusions)?;
            report.verdict = Verdict::Countermodel;

            let iteration = iterate(&mut solver, &encoding, problem, activation, &model, &deadline)?;
            report.models.push(model);
            report.models.extend(iteration.models);
            report.iteration_stop = iteration.stop;
        }
        SolveResponse::Unsat => {
            // Same deadline: the frame query spends what the goal query left
            match solver.solve().tap(|r| debug!("Frame query: {}", r)) {
                SolveResponse::Sat => {}
                SolveResponse::Unsat => {
                    return InfeasibleFrameSnafu {
                        reason: format!("no model of the frame and valuation constraints at N = {}", settings.n),
                    }
                    .fail()
                }
                SolveResponse::Unknown => return Err(deadline.timeout()),
            }
        }
        SolveResponse::Unknown => return Err(deadline.timeout()),
    }

    report.stats = solver.stats();
    report.elapsed = start_time.elapsed();
    info!(
        "Verdict: {} ({} model(s)) in {:.3} s",
        report.verdict,
        report.models.len(),
        report.elapsed.as_secs_f64()
    );
    debug!("Search effort: {}", report.stats);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use test_log::test;

    use super::*;
    use crate::bimodal::BimodalEncoder;
    use crate::hyper::HyperEncoder;
    use crate::settings::MAX_N;

    fn problem(premises: &[&str], conclusions: &[&str], settings: Settings) -> Problem {
        let parse = |xs: &[&str]| xs.iter().map(|s| s.parse().unwrap()).collect_vec();
        Problem::new(parse(premises), parse(conclusions), settings)
    }

    #[test]
    fn test_countermodel_is_verified() {
        let p = problem(&["(A \\vee B)"], &["(A \\wedge B)"], Settings::new(1));
        let report = check::<HyperEncoder>(&p, None).unwrap();
        assert_eq!(report.verdict, Verdict::Countermodel);
        assert_eq!(report.models.len(), 1);
        assert!(report.models[0].verify(&p.premises, &p.conclusions).is_ok());
        assert!(report.num_vars > 0 && report.num_clauses > 0);
        assert!(report.stats.propagations > 0);
    }

    #[test]
    fn test_no_countermodel() {
        let p = problem(&["A", "(\\neg A \\vee B)"], &["B"], Settings::new(2));
        let report = check::<HyperEncoder>(&p, None).unwrap();
        assert_eq!(report.verdict, Verdict::NoCountermodel);
        assert!(report.models.is_empty());
    }

    #[test]
    fn test_premises_only() {
        let p = problem(&["(A \\wedge \\neg A)"], &[], Settings::new(1));
        let report = check::<HyperEncoder>(&p, None).unwrap();
        assert_eq!(report.verdict, Verdict::NoCountermodel);

        let p = problem(&["\\Diamond A"], &[], Settings::new(1).with_m(1));
        let report = check::<BimodalEncoder>(&p, None).unwrap();
        assert_eq!(report.verdict, Verdict::Countermodel);
    }

    #[test]
    fn test_infeasible_frames() {
        let p = problem(&["A"], &["A"], Settings::new(0));
        assert!(matches!(check::<HyperEncoder>(&p, None), Err(CheckError::InfeasibleFrame { .. })));

        // A possible verifier and a possible falsifier cannot both be the only non-null state
        let p = problem(&["A"], &["A"], Settings::new(1).contingent().non_null());
        assert!(matches!(check::<HyperEncoder>(&p, None), Err(CheckError::InfeasibleFrame { .. })));
    }

    #[test]
    fn test_missing_m() {
        let p = problem(&["A"], &["A"], Settings::new(1));
        assert!(matches!(
            check::<BimodalEncoder>(&p, None),
            Err(CheckError::MissingSetting { key }) if key == "M"
        ));
    }

    #[test]
    fn test_interrupt_reports_timeout() {
        let p = problem(&["(A \\vee B)"], &["(A \\wedge B)"], Settings::new(2));
        let flag = Arc::new(AtomicBool::new(true));
        let result = check::<HyperEncoder>(&p, Some(flag));
        assert!(matches!(result, Err(CheckError::Timeout { .. })));
    }

    #[test]
    fn test_max_time_bounds_encoding() {
        // At the largest bound the counterfactual encoding alone takes far longer than this
        let settings = Settings::new(MAX_N).contingent().with_max_time(Duration::from_millis(200));
        let p = problem(&["((A \\boxright B) \\wedge (B \\boxright C))"], &["(A \\boxright C)"], settings);
        let started = Instant::now();
        let result = check::<HyperEncoder>(&p, None);
        assert!(matches!(result, Err(CheckError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(10), "{:?}", started.elapsed());
    }

    #[test]
    fn test_atoms_are_collected_once() {
        let p = problem(&["(B \\vee A)"], &["(A \\boxright C)"], Settings::new(1));
        let names = p.atoms().into_iter().map(Atom::name).collect::<String>();
        assert_eq!(names, "ABC");
    }
}
