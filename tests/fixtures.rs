//! Regression fixtures over both theories.

mod common;

use test_log::test;

use modal_nexus::engine::theory::{Bimodal, Counterfactual};
use modal_nexus::engine::Settings;

use common::*;

#[test]
fn disjunction_does_not_entail_conjunction() {
    let premises = ["(A \\vee B)"];
    let conclusions = ["(A \\wedge B)"];

    let report = check_counterfactual(&premises, &conclusions, Settings::new(1));
    assert_countermodel(&report);
    assert_sound(&Counterfactual::new(), &report, &premises, &conclusions);

    let report = check_bimodal(&premises, &conclusions, Settings::new(1).with_m(1));
    assert_countermodel(&report);
    assert_sound(&Bimodal::new(), &report, &premises, &conclusions);
}

#[test]
fn possibility_does_not_entail_actuality() {
    let premises = ["\\Diamond A"];
    let conclusions = ["A"];
    let report = check_bimodal(&premises, &conclusions, Settings::new(1).with_m(1));
    assert_countermodel(&report);
    assert_sound(&Bimodal::new(), &report, &premises, &conclusions);
}

#[test]
fn k_axiom_is_valid() {
    let report = check_bimodal(
        &["\\Box (A \\rightarrow B)"],
        &["(\\Box A \\rightarrow \\Box B)"],
        Settings::new(2).with_m(2),
    );
    assert_valid(&report);
}

#[test]
fn counterfactual_modus_ponens_is_valid() {
    let report = check_counterfactual(&["A", "(A \\boxright B)"], &["B"], Settings::new(3));
    assert_valid(&report);
}

#[test]
fn antecedent_strengthening_is_invalid() {
    let premises = ["\\neg A", "(A \\boxright C)"];
    let conclusions = ["((A \\wedge B) \\boxright C)"];
    let report = check_counterfactual(&premises, &conclusions, Settings::new(4));
    assert_countermodel(&report);
    assert_sound(&Counterfactual::new(), &report, &premises, &conclusions);
}

#[test]
fn counterfactual_identity_is_valid() {
    let report = check_counterfactual(&[], &["(A \\boxright A)"], Settings::new(2));
    assert_valid(&report);
}

#[test]
fn constitutive_theorems_hold_over_four_bits() {
    // Full ground, essence and identity encodings over 16 states
    let cases: [(&str, &str); 6] = [
        ("(A \\leq B)", "(\\neg A \\sqsubseteq \\neg B)"),
        ("(A \\sqsubseteq B)", "(\\neg A \\leq \\neg B)"),
        ("(A \\sqsubseteq B)", "((A \\wedge B) \\equiv B)"),
        ("((A \\wedge B) \\equiv B)", "(A \\sqsubseteq B)"),
        ("(A \\leq B)", "((A \\vee B) \\equiv B)"),
        ("((A \\vee B) \\equiv B)", "(A \\leq B)"),
    ];
    for (premise, conclusion) in cases {
        let report = check_counterfactual(&[premise], &[conclusion], Settings::new(4));
        assert_valid(&report);
    }
}
