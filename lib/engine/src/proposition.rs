//! Atom valuations and the setting toggles that constrain them.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::debug;
use ndarray::Array1;

use formula_parser::Atom;
use modal_nexus_core::lit::Lit;
use modal_nexus_core::op::ops::Ops;
use modal_nexus_core::solver::{Solver, SolverExt};

use crate::bimodal::BimodalFrame;
use crate::hyper::HyperFrame;
use crate::settings::Settings;
use crate::state::State;

/// Optional constraints on every atom, all off by default.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Toggles {
    pub contingent: bool,
    pub non_empty: bool,
    pub non_null: bool,
    pub disjoint: bool,
}

impl From<&Settings> for Toggles {
    fn from(settings: &Settings) -> Self {
        Self {
            contingent: settings.contingent,
            non_empty: settings.non_empty,
            non_null: settings.non_null,
            disjoint: settings.disjoint,
        }
    }
}

/// Verifier and falsifier literals, one per state.
#[derive(Debug, Clone)]
pub struct Content {
    pub ver: Array1<Lit>,
    pub fal: Array1<Lit>,
}

impl Content {
    pub fn new<S>(solver: &mut S, len: usize) -> Self
    where
        S: Solver,
    {
        Self {
            ver: solver.new_var_array(len),
            fal: solver.new_var_array(len),
        }
    }

    pub fn ver(&self, s: State) -> Lit {
        self.ver[s.index()]
    }

    pub fn fal(&self, s: State) -> Lit {
        self.fal[s.index()]
    }

    /// Content of the negation.
    pub fn swapped(&self) -> Content {
        Content {
            ver: self.fal.clone(),
            fal: self.ver.clone(),
        }
    }
}

/// Build the verifier/falsifier contents of `atoms` over a hyperintensional frame.
pub fn hyper_valuation<S>(solver: &mut S, frame: &HyperFrame, atoms: &[Atom], toggles: Toggles) -> BTreeMap<Atom, Content>
where
    S: Solver,
{
    let num_clauses = solver.num_clauses();
    let space = frame.space;

    let valuation: BTreeMap<Atom, Content> = atoms.iter().map(|&a| (a, Content::new(solver, space.len()))).collect();

    for content in valuation.values() {
        for (x, y) in space.states().cartesian_product(space.states().collect_vec()) {
            // Fusion closure
            if x < y {
                let z = x.fusion(y).index();
                solver.imply_imply(content.ver(x), content.ver(y), content.ver[z]);
                solver.imply_imply(content.fal(x), content.fal(y), content.fal[z]);
            }
            // Exclusivity
            solver.imply_imply(content.ver(x), content.fal(y), -frame.possible(x.fusion(y)));
        }

        // Exhaustivity
        for w in space.states() {
            let parts = space.parts(w).flat_map(|y| [content.ver(y), content.fal(y)]).collect_vec();
            solver.imply_or(frame.world(w), parts);
        }

        if toggles.contingent {
            // Some possible verifier and some possible falsifier
            for side in [&content.ver, &content.fal] {
                let witnesses = space
                    .states()
                    .map(|s| {
                        let v = solver.new_var();
                        solver.imply_and(v, [frame.possible(s), side[s.index()]]);
                        v
                    })
                    .collect_vec();
                solver.add_clause(witnesses);
            }
        }
        if toggles.non_empty {
            solver.add_clause(content.ver.iter().copied());
            solver.add_clause(content.fal.iter().copied());
        }
        if toggles.non_null {
            solver.add_unit(-content.ver(State::NULL));
            solver.add_unit(-content.fal(State::NULL));
        }
    }

    if toggles.disjoint {
        for ((_, p), (_, q)) in valuation.iter().tuple_combinations() {
            for (x, y) in space.states().cartesian_product(space.states().collect_vec()) {
                if !x.overlaps(y) {
                    continue;
                }
                for (u, v) in [(p.ver(x), q.ver(y)), (p.ver(x), q.fal(y)), (p.fal(x), q.ver(y)), (p.fal(x), q.fal(y))] {
                    solver.add_clause([-u, -v]);
                }
            }
        }
    }

    debug!(
        "Declared contents of {} atoms using {} clauses",
        valuation.len(),
        solver.num_clauses() - num_clauses
    );
    valuation
}

/// Build the world-state valuations of `atoms` over a bimodal frame.
///
/// An atom is the set of states it is true at; its falsifiers are the complement,
/// so `contingent` asks for a verifying and a falsifying state.
pub fn temporal_valuation<S>(
    solver: &mut S,
    frame: &BimodalFrame,
    atoms: &[Atom],
    toggles: Toggles,
) -> BTreeMap<Atom, Array1<Lit>>
where
    S: Solver,
{
    let num_clauses = solver.num_clauses();
    let space = frame.space;

    let valuation: BTreeMap<Atom, Array1<Lit>> =
        atoms.iter().map(|&a| (a, solver.new_var_array(space.len()))).collect();

    for val in valuation.values() {
        if toggles.contingent {
            solver.add_clause(val.iter().copied());
            solver.add_clause(val.iter().map(|&x| -x));
        }
        if toggles.non_empty {
            solver.add_clause(val.iter().copied());
        }
        if toggles.non_null {
            solver.add_unit(-val[State::NULL.index()]);
        }
    }

    if toggles.disjoint {
        for ((_, p), (_, q)) in valuation.iter().tuple_combinations() {
            for s in space.states() {
                solver.add_clause([-p[s.index()], -q[s.index()]]);
            }
        }
    }

    debug!(
        "Declared valuations of {} atoms using {} clauses",
        valuation.len(),
        solver.num_clauses() - num_clauses
    );
    valuation
}

/// Fresh literal that holds iff the state of history `h` at time index `t` is in `val`.
pub fn holds_at<S>(solver: &mut S, frame: &BimodalFrame, val: &Array1<Lit>, h: usize, t: usize) -> Lit
where
    S: Solver,
{
    let x = solver.new_var();
    for (s, eq) in frame.state[[h, t]].iter() {
        solver.imply_iff(eq, x, val[s.index()]);
    }
    x
}
