use itertools::Itertools;
use log::debug;

use crate::lit::Lit;
use crate::solver::{SolveResponse, Solver};

impl<S> AllSat for S where S: Solver {}

pub trait AllSat: Solver {
    /// Enumerate models that differ on at least one of the `essential` literals.
    fn all_sat_essential<I, T, F>(&mut self, essential: I, f: F) -> AllSolutionsIter<Self, F>
    where
        I: IntoIterator,
        I::Item: Into<Lit>,
        F: FnMut(&mut Self) -> T,
    {
        AllSolutionsIter::new(self, f, essential)
    }

    /// Clause excluding the current model's assignment to `essential`.
    fn build_refutation(&self, essential: &[Lit]) -> Vec<Lit> {
        essential
            .iter()
            .map(|&x| if self.value(x).is_true() { -x } else { x })
            .collect_vec()
    }
}

/// Iterator over models. Each step first bans the previous model, then re-solves
/// under the same assumptions; iteration ends at the first non-SAT response,
/// which is kept in [`AllSolutionsIter::stopped_by`].
pub struct AllSolutionsIter<'s, S, F>
where
    S: Solver,
{
    solver: &'s mut S,
    callback: F,
    essential: Vec<Lit>,
    assumptions: Vec<Lit>,
    refutation: Option<Vec<Lit>>,
    stopped_by: Option<SolveResponse>,
}

impl<'s, S, F> AllSolutionsIter<'s, S, F>
where
    S: Solver,
{
    fn new<I>(solver: &'s mut S, callback: F, essential: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Lit>,
    {
        let essential = essential.into_iter().map_into::<Lit>().collect_vec();
        Self {
            solver,
            callback,
            essential,
            assumptions: Vec::new(),
            refutation: None,
            stopped_by: None,
        }
    }

    /// Assumptions re-applied before every `solve` call.
    pub fn with_assumptions<I>(mut self, assumptions: I) -> Self
    where
        I: IntoIterator<Item = Lit>,
    {
        self.assumptions = assumptions.into_iter().collect();
        self
    }

    /// Skip the first search and start from an already-found model:
    /// it is banned before the next solve.
    pub fn resume_from_current_model(mut self) -> Self {
        self.refutation = Some(self.solver.build_refutation(&self.essential));
        self
    }

    /// The response that ended the iteration (`Unsat` or `Unknown`), if it ended.
    pub fn stopped_by(&self) -> Option<SolveResponse> {
        self.stopped_by
    }
}

impl<'s, T, S, F> Iterator for AllSolutionsIter<'s, S, F>
where
    S: Solver,
    F: FnMut(&mut S) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped_by.is_some() {
            return None;
        }

        if let Some(refutation) = self.refutation.take() {
            // Ban the solution
            debug!("Banning previous model over {} essential literals", refutation.len());
            self.solver.add_clause(refutation);
        }

        for &lit in self.assumptions.iter() {
            self.solver.assume(lit);
        }
        match self.solver.solve() {
            SolveResponse::Sat => {
                // Build the refutation
                self.refutation = Some(self.solver.build_refutation(&self.essential));

                // Call the callback in the SAT state
                Some((self.callback)(self.solver))
            }
            response => {
                self.stopped_by = Some(response);
                None
            }
        }
    }
}
