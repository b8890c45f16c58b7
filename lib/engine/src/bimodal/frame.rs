use itertools::Itertools;
use log::debug;
use ndarray::{Array1, Array2, Array3};

use modal_nexus_core::domainvar::DomainVar;
use modal_nexus_core::lit::Lit;
use modal_nexus_core::op::ops::Ops;
use modal_nexus_core::solver::{Solver, SolverExt};

use crate::deadline::Deadline;
use crate::error::*;
use crate::settings::check_m;
use crate::state::{State, StateSpace};
use crate::symmetry::lex_order;

/// Bounded set of world-histories.
///
/// History slot 0 is the main history, evaluated at time 0. Active slots form
/// a prefix; inactive ones stay at the null state and are ignored by every
/// quantifier. The other active slots hold pairwise distinct histories, all
/// different from the main one, in increasing lexicographic order, so every
/// set of histories has exactly one layout.
#[derive(Debug)]
pub struct BimodalFrame {
    pub space: StateSpace,
    pub m: usize,
    /// `active[h]`
    pub active: Array1<Lit>,
    /// `state[[h, t]]`: the world-state of history `h` at time index `t`.
    pub state: Array2<DomainVar<State>>,
    /// `task[[s, s']]`: `s'` may follow `s`.
    pub task: Array2<Lit>,
}

impl BimodalFrame {
    /// Number of history slots for `n` state bits and `m` time points each way.
    pub fn history_bound(n: usize, m: usize) -> usize {
        (1 << n) + 2 * (2 * m - 1)
    }

    pub fn new<S>(solver: &mut S, space: StateSpace, m: usize, deadline: &Deadline) -> Result<Self>
    where
        S: Solver,
    {
        let m = check_m(m)?;
        let num_histories = Self::history_bound(space.n(), m);
        let num_times = 2 * m - 1;

        let active = solver.new_var_array(num_histories);
        let state = Array2::from_shape_simple_fn((num_histories, num_times), || {
            solver.new_domain_var(space.states())
        });
        let task = solver.new_var_array((space.len(), space.len()));
        let frame = Self {
            space,
            m,
            active,
            state,
            task,
        };
        frame.declare(solver, deadline)?;
        Ok(frame)
    }

    pub fn num_histories(&self) -> usize {
        self.active.len()
    }

    pub fn num_times(&self) -> usize {
        2 * self.m - 1
    }

    /// Time index of time 0.
    pub fn now(&self) -> usize {
        self.m - 1
    }

    /// Time value at index `t`.
    pub fn time(&self, t: usize) -> i32 {
        t as i32 - self.now() as i32
    }

    /// All `(history, time index)` pairs.
    pub fn slices(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.num_histories()).cartesian_product(0..self.num_times())
    }

    pub fn eq(&self, h: usize, t: usize, s: State) -> Lit {
        self.state[[h, t]].eq(s)
    }

    /// One-hot literals of history `h`, time by time.
    fn history_lits(&self, h: usize) -> Vec<Lit> {
        (0..self.num_times())
            .flat_map(|t| self.state[[h, t]].lits().to_vec())
            .collect()
    }

    fn declare<S>(&self, solver: &mut S, deadline: &Deadline) -> Result<()>
    where
        S: Solver,
    {
        let num_clauses = solver.num_clauses();
        let num_histories = self.num_histories();
        let num_times = self.num_times();
        let states = self.space.states().collect_vec();

        // Active slots: the main one and a prefix after it
        solver.add_unit(self.active[0]);
        for h in 1..num_histories {
            solver.imply(self.active[h], self.active[h - 1]);
        }
        for (h, t) in self.slices() {
            solver.imply(-self.active[h], self.eq(h, t, State::NULL));
        }

        // Canonical layout: the other active histories differ from the main one...
        let main = self.history_lits(0);
        for h in 1..num_histories {
            let lits = self.history_lits(h);
            let differs = lits
                .iter()
                .zip(&main)
                .map(|(&x, &y)| {
                    let d = solver.new_var();
                    solver.imply(d, x);
                    solver.imply(d, -y);
                    d
                })
                .collect_vec();
            solver.imply_or(self.active[h], differs);
        }
        // ...and increase strictly from slot 1 on
        for h in 2..num_histories {
            lex_order(solver, Some(self.active[h]), &self.history_lits(h - 1), &self.history_lits(h), true);
        }
        deadline.check()?;

        // Histories follow the task relation...
        for h in 0..num_histories {
            deadline.check()?;
            for t in 0..num_times - 1 {
                for (&s, &s2) in states.iter().cartesian_product(&states) {
                    solver.add_clause([
                        -self.active[h],
                        -self.eq(h, t, s),
                        -self.eq(h, t + 1, s2),
                        self.task[[s.index(), s2.index()]],
                    ]);
                }
            }
        }
        // ...and every task pair is a step of some active history
        for &s in &states {
            deadline.check()?;
            for &s2 in &states {
                let steps = (0..num_histories)
                    .cartesian_product(0..num_times - 1)
                    .map(|(h, t)| {
                        let step = solver.new_var();
                        solver.imply_and(step, [self.active[h], self.eq(h, t, s), self.eq(h, t + 1, s2)]);
                        step
                    })
                    .collect_vec();
                solver.imply_or(self.task[[s.index(), s2.index()]], steps);
            }
        }

        // Time-shift closure: shifting an active history by one step in either
        // direction agrees with some active history on the overlap
        if num_times > 1 {
            let select: Array3<Lit> = Array3::from_shape_simple_fn((num_histories, 2, num_histories), || solver.new_var());
            for h in 0..num_histories {
                deadline.check()?;
                for (d, shift) in [-1i64, 1].into_iter().enumerate() {
                    let candidates = (0..num_histories).map(|h2| select[[h, d, h2]]).collect_vec();
                    solver.imply_or(self.active[h], candidates);
                    for h2 in 0..num_histories {
                        let sel = select[[h, d, h2]];
                        solver.imply(sel, self.active[h2]);
                        for t in 0..num_times {
                            let shifted = t as i64 + shift;
                            if shifted < 0 || shifted >= num_times as i64 {
                                continue;
                            }
                            for &s in &states {
                                solver.imply_imply(sel, self.eq(h, shifted as usize, s), self.eq(h2, t, s));
                            }
                        }
                    }
                }
            }
        }

        debug!(
            "Declared bimodal frame with {} history slots over {} times using {} clauses",
            num_histories,
            num_times,
            solver.num_clauses() - num_clauses
        );
        Ok(())
    }

    /// Literals that pin down the histories.
    pub fn essential(&self) -> impl Iterator<Item = Lit> + '_ {
        self.active
            .iter()
            .copied()
            .chain(self.state.iter().flat_map(|v| v.lits().iter().copied()))
    }
}
