//! Enumeration of further, pairwise distinct countermodels.

use log::debug;

use modal_nexus_core::lit::Lit;
use modal_nexus_core::op::allsat::AllSat;
use modal_nexus_core::solver::{SolveResponse, Solver};

use crate::deadline::Deadline;
use crate::driver::{Encoding, Problem};
use crate::error::*;
use crate::model::Countermodel;

#[derive(Debug, Default)]
pub struct Iteration {
    /// Models found after the current one.
    pub models: Vec<Countermodel>,
    /// Set when fewer than the requested number of models were found.
    pub stop: Option<CheckError>,
}

/// Starting from `first`, the model currently held by `solver`, find up to
/// `iterate - 1` more models, each differing from all previous ones on the
/// essential literals and in structure. Only blocking clauses are added, and
/// every search runs against the deadline of the whole check.
pub fn iterate<E, S>(
    solver: &mut S,
    encoding: &E,
    problem: &Problem,
    activation: Lit,
    first: &Countermodel,
    deadline: &Deadline,
) -> Result<Iteration>
where
    E: Encoding,
    S: Solver,
{
    let requested = problem.settings.iterate;
    let mut iteration = Iteration::default();
    if requested <= 1 {
        return Ok(iteration);
    }

    solver.set_limits(deadline.limits());
    let mut models = solver
        .all_sat_essential(encoding.essential(), |s| encoding.extract(s))
        .resume_from_current_model()
        .with_assumptions([activation]);

    while iteration.models.len() + 1 < requested {
        let model = match models.next() {
            Some(model) => model?,
            None => break,
        };
        if std::iter::once(first).chain(&iteration.models).any(|m| m.same_structure(&model)) {
            debug!("Skipping a model with the structure of an earlier one");
            continue;
        }
        model.verify(&problem.premises, &problem.conclusions)?;
        iteration.models.push(model);
        debug!("Found model {}/{}", iteration.models.len() + 1, requested);
    }

    let found = iteration.models.len() + 1;
    if found < requested {
        iteration.stop = Some(match models.stopped_by() {
            Some(SolveResponse::Unknown) => deadline.timeout(),
            _ => CheckError::IterationExhausted { requested, found },
        });
        debug!("Iteration stopped after {} model(s)", found);
    }
    Ok(iteration)
}
