use itertools::Itertools;
use log::debug;
use ndarray::Array1;

use modal_nexus_core::domainvar::DomainVar;
use modal_nexus_core::lit::Lit;
use modal_nexus_core::op::ops::Ops;
use modal_nexus_core::solver::{Solver, SolverExt};

use crate::state::{State, StateSpace};

/// Possibility and world-hood of every state, plus the evaluation world.
#[derive(Debug)]
pub struct HyperFrame {
    pub space: StateSpace,
    /// `possible[s]`
    pub possible: Array1<Lit>,
    /// `world[s]`: `s` is a maximal possible state.
    pub world: Array1<Lit>,
    /// Evaluation world.
    pub eval: DomainVar<State>,
}

impl HyperFrame {
    pub fn new<S>(solver: &mut S, space: StateSpace) -> Self
    where
        S: Solver,
    {
        let possible = solver.new_var_array(space.len());
        let world = solver.new_var_array(space.len());
        let eval = solver.new_domain_var(space.states());
        let frame = Self {
            space,
            possible,
            world,
            eval,
        };
        frame.declare(solver);
        frame
    }

    fn declare<S>(&self, solver: &mut S)
    where
        S: Solver,
    {
        let num_clauses = solver.num_clauses();

        // The null state is possible
        solver.add_unit(self.possible[State::NULL.index()]);

        // Parts of possible states are possible
        for s in self.space.states() {
            for b in self.space.atoms().filter(|b| b.is_part_of(s)) {
                let t = State::new(s.bits() & !b.bits());
                solver.imply(self.possible[s.index()], self.possible[t.index()]);
            }
        }

        // Worlds are the possible states with no possible one-bit extension
        for s in self.space.states() {
            let rhs = std::iter::once(self.possible[s.index()])
                .chain(self.space.extensions(s).map(|b| -self.possible[s.fusion(b).index()]))
                .collect_vec();
            solver.iff_and(self.world[s.index()], rhs);
        }

        solver.add_clause(self.world.iter().copied());

        for s in self.space.states() {
            solver.imply(self.eval.eq(s), self.world[s.index()]);
        }

        debug!(
            "Declared hyperintensional frame over {} states using {} clauses",
            self.space.len(),
            solver.num_clauses() - num_clauses
        );
    }

    pub fn possible(&self, s: State) -> Lit {
        self.possible[s.index()]
    }

    pub fn world(&self, s: State) -> Lit {
        self.world[s.index()]
    }
}
