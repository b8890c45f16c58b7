//! Counterfactual, ground and essence inferences in the hyperintensional theory.

mod common;

use test_log::test;

use modal_nexus::engine::theory::Counterfactual;
use modal_nexus::engine::{Settings, Verdict};

use common::*;

struct Case {
    name: &'static str,
    premises: &'static [&'static str],
    conclusions: &'static [&'static str],
    n: usize,
}

fn run_invalid(cases: &[Case]) {
    let theory = Counterfactual::new();
    for case in cases {
        let report = check_counterfactual(case.premises, case.conclusions, cf_settings(case.n));
        assert_eq!(report.verdict, Verdict::Countermodel, "{} should have a countermodel", case.name);
        assert_sound(&theory, &report, case.premises, case.conclusions);
    }
}

fn run_valid(cases: &[Case]) {
    for case in cases {
        let report = check_counterfactual(case.premises, case.conclusions, Settings::new(case.n));
        assert_eq!(report.verdict, Verdict::NoCountermodel, "{} should be valid", case.name);
    }
}

#[test]
fn counterfactual_countermodels() {
    run_invalid(&[
        Case {
            name: "contraposition",
            premises: &["(A \\boxright B)"],
            conclusions: &["(\\neg B \\boxright \\neg A)"],
            n: 4,
        },
        Case {
            name: "transitivity",
            premises: &["(A \\boxright B)", "(B \\boxright C)"],
            conclusions: &["(A \\boxright C)"],
            n: 4,
        },
        Case {
            name: "true antecedent and consequent",
            premises: &["A", "B"],
            conclusions: &["(A \\boxright B)"],
            n: 4,
        },
        Case {
            name: "conditional excluded middle",
            premises: &["\\neg A"],
            conclusions: &["(A \\boxright B)", "(A \\boxright \\neg B)"],
            n: 4,
        },
        Case {
            name: "might strengthening",
            premises: &["\\neg A", "(A \\diamondright C)"],
            conclusions: &["((A \\wedge B) \\diamondright C)"],
            n: 3,
        },
        Case {
            name: "box distribution over disjunction",
            premises: &["\\Box (A \\vee B)"],
            conclusions: &["(\\Box A \\vee \\Box B)"],
            n: 3,
        },
    ]);
}

#[test]
fn counterfactual_theorems() {
    run_valid(&[
        Case {
            name: "weakened transitivity",
            premises: &["(A \\boxright B)", "((A \\wedge B) \\boxright C)"],
            conclusions: &["(A \\boxright C)"],
            n: 3,
        },
        Case {
            name: "simplification of disjunctive antecedents",
            premises: &["((A \\vee B) \\boxright C)"],
            conclusions: &["((A \\boxright C) \\wedge (B \\boxright C))"],
            n: 3,
        },
        Case {
            name: "consequent weakening",
            premises: &["(A \\boxright (B \\wedge C))"],
            conclusions: &["(A \\boxright B)"],
            n: 3,
        },
        Case {
            name: "consequent agglomeration",
            premises: &["(A \\boxright B)", "(A \\boxright C)"],
            conclusions: &["(A \\boxright (B \\wedge C))"],
            n: 3,
        },
        Case {
            name: "centering for might",
            premises: &["A", "B"],
            conclusions: &["(A \\diamondright B)"],
            n: 3,
        },
        Case {
            name: "necessity implies counterfactual necessity",
            premises: &["\\Box A"],
            conclusions: &["\\CFBox A"],
            n: 3,
        },
        Case {
            name: "impossible negation",
            premises: &["(\\neg A \\boxright \\bot)"],
            conclusions: &["(\\top \\boxright A)"],
            n: 3,
        },
    ]);
}

#[test]
fn constitutive_countermodels() {
    run_invalid(&[
        Case {
            name: "ground of conjunctions",
            premises: &["(A \\leq B)", "(C \\leq D)"],
            conclusions: &["((A \\wedge C) \\leq (B \\wedge D))"],
            n: 3,
        },
        Case {
            name: "essence of disjunctions",
            premises: &["(A \\sqsubseteq B)", "(C \\sqsubseteq D)"],
            conclusions: &["((A \\vee C) \\sqsubseteq (B \\vee D))"],
            n: 3,
        },
        Case {
            name: "absorption",
            premises: &[],
            conclusions: &["(A \\equiv (A \\vee (A \\wedge B)))"],
            n: 3,
        },
        Case {
            name: "distribution",
            premises: &[],
            conclusions: &["((A \\vee (B \\wedge C)) \\equiv ((A \\vee B) \\wedge (A \\vee C)))"],
            n: 3,
        },
    ]);
}

#[test]
fn constitutive_theorems() {
    run_valid(&[
        Case {
            name: "ground to essence of negations",
            premises: &["(A \\leq B)"],
            conclusions: &["(\\neg A \\sqsubseteq \\neg B)"],
            n: 3,
        },
        Case {
            name: "essence to ground of negations",
            premises: &["(A \\sqsubseteq B)"],
            conclusions: &["(\\neg A \\leq \\neg B)"],
            n: 3,
        },
        Case {
            name: "essence as conjunctive identity",
            premises: &["(A \\sqsubseteq B)"],
            conclusions: &["((A \\wedge B) \\equiv B)"],
            n: 3,
        },
        Case {
            name: "conjunctive identity as essence",
            premises: &["((A \\wedge B) \\equiv B)"],
            conclusions: &["(A \\sqsubseteq B)"],
            n: 3,
        },
        Case {
            name: "ground as disjunctive identity",
            premises: &["(A \\leq B)"],
            conclusions: &["((A \\vee B) \\equiv B)"],
            n: 3,
        },
        Case {
            name: "disjunctive identity as ground",
            premises: &["((A \\vee B) \\equiv B)"],
            conclusions: &["(A \\leq B)"],
            n: 3,
        },
        Case {
            name: "identity of negations",
            premises: &["(A \\equiv B)"],
            conclusions: &["(\\neg A \\equiv \\neg B)"],
            n: 3,
        },
    ]);
}

const SOBEL: [&str; 7] = [
    "(A \\boxright X)",
    "\\neg ((A \\wedge B) \\boxright X)",
    "(((A \\wedge B) \\wedge C) \\boxright X)",
    "\\neg ((((A \\wedge B) \\wedge C) \\wedge D) \\boxright X)",
    "(((((A \\wedge B) \\wedge C) \\wedge D) \\wedge E) \\boxright X)",
    "\\neg ((((((A \\wedge B) \\wedge C) \\wedge D) \\wedge E) \\wedge F) \\boxright X)",
    "(((((((A \\wedge B) \\wedge C) \\wedge D) \\wedge E) \\wedge F) \\wedge G) \\boxright X)",
];

#[test]
fn sobel_prefix_fits_four_bits() {
    let premises = &SOBEL[..3];
    let report = check_counterfactual(premises, &[], cf_settings(4));
    assert_countermodel(&report);
    assert_sound(&Counterfactual::new(), &report, premises, &[]);
}

#[test]
fn sobel_sequence_needs_five_bits() {
    // With contingent non-null contents the full sequence has no countermodel over four bits
    let report = check_counterfactual(&SOBEL, &[], cf_settings(5));
    assert_countermodel(&report);
    assert_sound(&Counterfactual::new(), &report, &SOBEL, &[]);
}

#[test]
fn sobel_sequence_with_possibilities() {
    let antecedents = [
        "A",
        "(A \\wedge B)",
        "((A \\wedge B) \\wedge C)",
        "(((A \\wedge B) \\wedge C) \\wedge D)",
        "((((A \\wedge B) \\wedge C) \\wedge D) \\wedge E)",
        "(((((A \\wedge B) \\wedge C) \\wedge D) \\wedge E) \\wedge F)",
        "((((((A \\wedge B) \\wedge C) \\wedge D) \\wedge E) \\wedge F) \\wedge G)",
    ];
    let possibilities = antecedents.iter().map(|a| format!("\\Diamond {}", a)).collect::<Vec<_>>();
    let premises = possibilities
        .iter()
        .zip(SOBEL)
        .flat_map(|(p, cf)| [p.as_str(), cf])
        .collect::<Vec<_>>();
    let report = check_counterfactual(&premises, &[], cf_settings(5));
    assert_countermodel(&report);
    assert_sound(&Counterfactual::new(), &report, &premises, &[]);
}

#[test]
fn counterfactual_box_matches_necessity() {
    let report = check_counterfactual(&[], &["(\\CFBox A \\leftrightarrow \\Box A)"], Settings::new(4));
    assert_valid(&report);
}
