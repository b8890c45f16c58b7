//! Lexicographic ordering constraints that cut symmetric copies of a model.
//!
//! Relabelling the atomic state bits maps every model of a counterfactual query
//! onto another model of the same query, and reordering the non-main history
//! slots does the same for bimodal queries. Requiring a model to be no larger
//! than its relabelled image keeps at least one model of every class.

use log::debug;

use modal_nexus_core::lit::Lit;
use modal_nexus_core::solver::Solver;

use crate::state::{State, StateSpace};

/// `xs <= ys` lexicographically with `false < true`, or `xs < ys` when `strict`.
/// Enforced only when `guard` holds, if there is one.
pub fn lex_order<S>(solver: &mut S, guard: Option<Lit>, xs: &[Lit], ys: &[Lit], strict: bool)
where
    S: Solver,
{
    debug_assert_eq!(xs.len(), ys.len());
    // `equal` holds while all earlier positions agree; `None` stands for true
    let mut equal: Option<Lit> = None;
    for (&x, &y) in xs.iter().zip(ys) {
        if x == y {
            continue;
        }
        let prefix = || guard.into_iter().chain(equal).map(|l| -l);
        solver.add_clause(prefix().chain([-x, y]));
        let next = solver.new_var();
        // With `x <= y` already enforced, the positions agree unless `y` alone is true
        solver.add_clause(prefix().chain([-x, next]));
        solver.add_clause(prefix().chain([y, next]));
        equal = Some(next);
    }
    if strict {
        solver.add_clause(guard.into_iter().chain(equal).map(|l| -l));
    }
}

/// For each swap of adjacent state bits, require `lits(s)` listed over all states
/// to be lexicographically no larger than its image under the swap.
///
/// `lits` must return, for every state, literals whose meaning moves with the
/// state under any relabelling of bits.
pub fn break_bit_swaps<S, F>(solver: &mut S, space: StateSpace, lits: F)
where
    S: Solver,
    F: Fn(State) -> Vec<Lit>,
{
    let num_clauses = solver.num_clauses();
    let per_state = space.states().map(&lits).collect::<Vec<_>>();
    for i in 1..space.n() {
        let xs = per_state.iter().flatten().copied().collect::<Vec<_>>();
        let ys = space
            .states()
            .flat_map(|s| per_state[s.swap_bits(i - 1, i).index()].iter().copied())
            .collect::<Vec<_>>();
        lex_order(solver, None, &xs, &ys, false);
    }
    debug!(
        "Ordered {} bit swaps using {} clauses",
        space.n().saturating_sub(1),
        solver.num_clauses() - num_clauses
    );
}
