#![allow(dead_code)]

use std::time::Duration;

use modal_nexus::engine::theory::{Bimodal, Counterfactual};
use modal_nexus::engine::{Problem, Report, Settings, Theory, Verdict};
use modal_nexus::formula::Formula;

pub fn formulas(sources: &[&str]) -> Vec<Formula> {
    sources
        .iter()
        .map(|s| s.parse().unwrap_or_else(|e| panic!("bad formula {:?}: {}", s, e)))
        .collect()
}

/// Problem with a generous per-call time limit, so slow test machines do not time out.
pub fn problem(premises: &[&str], conclusions: &[&str], settings: Settings) -> Problem {
    let settings = settings.with_max_time(Duration::from_secs(60));
    Problem::new(formulas(premises), formulas(conclusions), settings)
}

pub fn check_counterfactual(premises: &[&str], conclusions: &[&str], settings: Settings) -> Report {
    let problem = problem(premises, conclusions, settings);
    Counterfactual::new().check(&problem, None).unwrap()
}

pub fn check_bimodal(premises: &[&str], conclusions: &[&str], settings: Settings) -> Report {
    let problem = problem(premises, conclusions, settings);
    Bimodal::new().check(&problem, None).unwrap()
}

/// Every returned model makes the premises true and some conclusion false.
pub fn assert_sound(theory: &dyn Theory, report: &Report, premises: &[&str], conclusions: &[&str]) {
    let prepare = |sources: &[&str]| {
        formulas(sources)
            .iter()
            .map(|f| theory.operators().prepare(theory.name(), f).unwrap())
            .collect::<Vec<_>>()
    };
    let premises = prepare(premises);
    let conclusions = prepare(conclusions);
    for model in &report.models {
        model.verify(&premises, &conclusions).unwrap();
    }
}

pub fn assert_countermodel(report: &Report) {
    assert_eq!(report.verdict, Verdict::Countermodel);
    assert!(!report.models.is_empty());
}

pub fn assert_valid(report: &Report) {
    assert_eq!(report.verdict, Verdict::NoCountermodel);
    assert!(report.models.is_empty());
}

/// Settings used by most counterfactual examples.
pub fn cf_settings(n: usize) -> Settings {
    Settings::new(n).contingent().non_null().non_empty()
}
