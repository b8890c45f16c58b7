//! Hyperintensional semantics: possible states, maximal worlds and
//! verifier/falsifier contents.

use log::debug;

use formula_parser::{Atom, Formula};
use modal_nexus_core::lit::Lit;
use modal_nexus_core::solver::Solver;

use crate::deadline::Deadline;
use crate::driver::Encoding;
use crate::error::*;
use crate::model::Countermodel;
use crate::proposition::hyper_valuation;
use crate::settings::Settings;
use crate::state::StateSpace;
use crate::symmetry::break_bit_swaps;

pub mod frame;
pub mod model;
pub mod operators;

pub use frame::HyperFrame;
pub use model::HyperModel;
pub use operators::HyperEncoder;

impl Encoding for HyperEncoder {
    fn build<S>(solver: &mut S, settings: &Settings, atoms: &[Atom], deadline: &Deadline) -> Result<Self>
    where
        S: Solver,
    {
        if let Some(m) = settings.m {
            debug!("Ignoring M = {}: the counterfactual theory has no times", m);
        }
        let frame = HyperFrame::new(solver, StateSpace::new(settings.n));
        let valuation = hyper_valuation(solver, &frame, atoms, settings.into());
        deadline.check()?;
        // Relabelling state bits maps models to models
        break_bit_swaps(solver, frame.space, |s| {
            let mut lits = vec![frame.possible(s), frame.eval.eq(s)];
            lits.extend(valuation.values().flat_map(|c| [c.ver(s), c.fal(s)]));
            lits
        });
        Ok(HyperEncoder::new(solver, frame, valuation).with_deadline(deadline.clone()))
    }

    fn truth_at_eval<S>(&mut self, solver: &mut S, formula: &Formula) -> Result<Lit>
    where
        S: Solver,
    {
        HyperEncoder::truth_at_eval(self, solver, formula)
    }

    fn essential(&self) -> Vec<Lit> {
        HyperEncoder::essential(self)
    }

    fn extract<S>(&self, solver: &S) -> Result<Countermodel>
    where
        S: Solver,
    {
        HyperModel::extract(solver, self).map(Countermodel::Hyperintensional)
    }
}
