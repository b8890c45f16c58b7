use modal_nexus::core::lit::Lit;
use modal_nexus::core::op::allsat::AllSat;
use modal_nexus::core::solver::{Solver, SolverExt};
use modal_nexus::wrappers::simplesat::SimpleSatSolver;

#[test]
fn all_solutions_5vars() {
    let mut solver = SimpleSatSolver::new();

    let n = 5;
    let lits = solver.new_var_vec(n);
    assert_eq!(solver.num_vars(), n);

    // Mention every variable so the solver assigns all of them.
    for &x in &lits {
        solver.add_clause([x, -x]);
    }

    let num_solutions = solver.all_sat_essential(lits, |_| ()).count();
    assert_eq!(num_solutions, 32);
}

#[test]
fn all_solutions_essential_3of5vars() {
    let mut solver = SimpleSatSolver::new();

    let n = 5;
    let lits = solver.new_var_vec(n);
    solver.add_clause([Lit::from(n), -Lit::from(n)]);

    let k = 3;
    let essential = lits[0..k].to_vec();
    let num_solutions = solver.all_sat_essential(essential, |_| ()).count();
    assert_eq!(num_solutions, 8);
}

#[test]
fn all_solutions_respect_clauses() {
    let mut solver = SimpleSatSolver::new();

    let lits = solver.new_var_vec(3);
    // Exactly one of three.
    solver.add_clause(lits.clone());
    for i in 0..3 {
        for j in i + 1..3 {
            solver.add_clause([-lits[i], -lits[j]]);
        }
    }

    let models = solver
        .all_sat_essential(lits.clone(), |s| lits.iter().map(|&x| s.value(x).bool()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(models.len(), 3);
    assert!(models.iter().all(|m| m.iter().filter(|&&b| b).count() == 1));
}
