use crate::lit::Lit;

use super::limits::SearchLimits;
use super::types::*;

/// Incremental SAT backend: clauses only grow, and assumptions hold for a single `solve` call.
pub trait Solver: Sized {
    fn num_vars(&self) -> usize;

    fn num_clauses(&self) -> usize;

    fn new_var(&mut self) -> Lit;

    /// Add an assumption for the next `solve` call only.
    fn assume<L>(&mut self, lit: L)
    where
        L: Into<Lit>;

    fn add_clause<I>(&mut self, lits: I)
    where
        I: IntoIterator,
        I::Item: Into<Lit>;

    fn add_unit<L>(&mut self, lit: L)
    where
        L: Into<Lit>,
    {
        self.add_clause([lit.into()])
    }

    /// Limits applied to every subsequent `solve` call.
    fn set_limits(&mut self, limits: SearchLimits);

    /// Solve under the pending assumptions (which are then cleared).
    fn solve(&mut self) -> SolveResponse;

    /// Value of the literal in the last model.
    fn value<L>(&self, lit: L) -> LitValue
    where
        L: Into<Lit>;

    fn stats(&self) -> SolveStats;
}
