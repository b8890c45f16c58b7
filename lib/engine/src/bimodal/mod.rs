//! Bimodal semantics: world-histories over a bounded time interval.

use formula_parser::{Atom, Formula};
use modal_nexus_core::lit::Lit;
use modal_nexus_core::solver::Solver;

use crate::deadline::Deadline;
use crate::driver::Encoding;
use crate::error::*;
use crate::model::Countermodel;
use crate::proposition::temporal_valuation;
use crate::settings::Settings;
use crate::state::StateSpace;

pub mod frame;
pub mod model;
pub mod operators;

pub use frame::BimodalFrame;
pub use model::BimodalModel;
pub use operators::BimodalEncoder;

impl Encoding for BimodalEncoder {
    fn build<S>(solver: &mut S, settings: &Settings, atoms: &[Atom], deadline: &Deadline) -> Result<Self>
    where
        S: Solver,
    {
        let m = settings.require_m()?;
        let frame = BimodalFrame::new(solver, StateSpace::new(settings.n), m, deadline)?;
        let valuation = temporal_valuation(solver, &frame, atoms, settings.into());
        Ok(BimodalEncoder::new(solver, frame, valuation).with_deadline(deadline.clone()))
    }

    fn truth_at_eval<S>(&mut self, solver: &mut S, formula: &Formula) -> Result<Lit>
    where
        S: Solver,
    {
        BimodalEncoder::truth_at_eval(self, solver, formula)
    }

    fn essential(&self) -> Vec<Lit> {
        BimodalEncoder::essential(self)
    }

    fn extract<S>(&self, solver: &S) -> Result<Countermodel>
    where
        S: Solver,
    {
        BimodalModel::extract(solver, self).map(Countermodel::Bimodal)
    }
}
