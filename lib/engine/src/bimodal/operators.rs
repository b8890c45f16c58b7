use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use log::debug;
use ndarray::Array1;

use formula_parser::{Atom, BinaryOp, Formula, UnaryOp};
use modal_nexus_core::lit::Lit;
use modal_nexus_core::solver::Solver;

use crate::bimodal::BimodalFrame;
use crate::deadline::Deadline;
use crate::error::*;
use crate::gates::Gates;
use crate::proposition::holds_at;

/// Translates formulas into truth literals at `(history, time)` points of a [`BimodalFrame`].
#[derive(Debug)]
pub struct BimodalEncoder {
    pub frame: BimodalFrame,
    pub valuation: BTreeMap<Atom, Array1<Lit>>,
    gates: Gates,
    deadline: Deadline,
    truths: HashMap<(Formula, usize, usize), Lit>,
    /// Modal truths do not depend on the history.
    modal: HashMap<(Formula, usize), Lit>,
}

impl BimodalEncoder {
    pub fn new<S>(solver: &mut S, frame: BimodalFrame, valuation: BTreeMap<Atom, Array1<Lit>>) -> Self
    where
        S: Solver,
    {
        Self {
            frame,
            valuation,
            gates: Gates::new(solver),
            deadline: Deadline::none(),
            truths: HashMap::new(),
            modal: HashMap::new(),
        }
    }

    /// Give up with `Timeout` once `deadline` passes.
    pub fn with_deadline(self, deadline: Deadline) -> Self {
        Self { deadline, ..self }
    }

    /// Literal that holds iff `formula` is true on the main history at time 0.
    pub fn truth_at_eval<S>(&mut self, solver: &mut S, formula: &Formula) -> Result<Lit>
    where
        S: Solver,
    {
        let num_vars = solver.num_vars();
        let x = self.truth(solver, formula, 0, self.frame.now())?;
        debug!("Encoded `{}` using {} variables", formula, solver.num_vars() - num_vars);
        Ok(x)
    }

    /// Literal for "`formula` is true on history `h` at time index `t`".
    pub fn truth<S>(&mut self, solver: &mut S, formula: &Formula, h: usize, t: usize) -> Result<Lit>
    where
        S: Solver,
    {
        if let Some(&lit) = self.truths.get(&(formula.clone(), h, t)) {
            return Ok(lit);
        }
        self.deadline.check()?;
        let lit = match formula {
            Formula::Atom(atom) => match self.valuation.get(atom) {
                Some(val) => holds_at(solver, &self.frame, val, h, t),
                None => {
                    return InfeasibleFrameSnafu {
                        reason: format!("atom {} has no valuation", atom),
                    }
                    .fail()
                }
            },
            Formula::Top => self.gates.constant(true),
            Formula::Bot => self.gates.constant(false),
            Formula::Unary(UnaryOp::Neg, arg) => -self.truth(solver, arg, h, t)?,
            Formula::Unary(op @ (UnaryOp::Box | UnaryOp::Diamond), arg) => {
                self.modal_truth(solver, *op == UnaryOp::Box, formula, arg, t)?
            }
            Formula::Unary(op @ (UnaryOp::Future | UnaryOp::SomeFuture | UnaryOp::Past | UnaryOp::SomePast), arg) => {
                let times = match op {
                    UnaryOp::Future | UnaryOp::SomeFuture => (t + 1..self.frame.num_times()).collect_vec(),
                    _ => (0..t).collect_vec(),
                };
                let mut xs = Vec::with_capacity(times.len());
                for t2 in times {
                    xs.push(self.truth(solver, arg, h, t2)?);
                }
                // Empty ranges give the vacuous values: an empty `and` is true, an empty `or` is false
                match op {
                    UnaryOp::Future | UnaryOp::Past => self.gates.and(solver, xs),
                    _ => self.gates.or(solver, xs),
                }
            }
            Formula::Binary(BinaryOp::And, lhs, rhs) => {
                let a = self.truth(solver, lhs, h, t)?;
                let b = self.truth(solver, rhs, h, t)?;
                self.gates.and(solver, [a, b])
            }
            Formula::Binary(BinaryOp::Or, lhs, rhs) => {
                let a = self.truth(solver, lhs, h, t)?;
                let b = self.truth(solver, rhs, h, t)?;
                self.gates.or(solver, [a, b])
            }
            other => {
                return UnsupportedOperatorSnafu {
                    theory: "bimodal",
                    operator: other.operator().map_or_else(|| other.to_string(), |op| op.to_string()),
                }
                .fail()
            }
        };
        self.truths.insert((formula.clone(), h, t), lit);
        Ok(lit)
    }

    fn modal_truth<S>(&mut self, solver: &mut S, necessity: bool, formula: &Formula, arg: &Formula, t: usize) -> Result<Lit>
    where
        S: Solver,
    {
        if let Some(&lit) = self.modal.get(&(formula.clone(), t)) {
            return Ok(lit);
        }
        let mut xs = Vec::with_capacity(self.frame.num_histories());
        for h in 0..self.frame.num_histories() {
            let active = self.frame.active[h];
            let x = self.truth(solver, arg, h, t)?;
            xs.push(if necessity {
                self.gates.or(solver, [-active, x])
            } else {
                self.gates.and(solver, [active, x])
            });
        }
        let lit = if necessity {
            self.gates.and(solver, xs)
        } else {
            self.gates.or(solver, xs)
        };
        self.modal.insert((formula.clone(), t), lit);
        Ok(lit)
    }

    /// Literals that pin down a model: the histories and the atom valuations.
    pub fn essential(&self) -> Vec<Lit> {
        self.frame
            .essential()
            .chain(self.valuation.values().flat_map(|val| val.iter().copied()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use modal_nexus_core::solver::SolveResponse;
    use modal_nexus_wrappers::simplesat::SimpleSatSolver;
    use test_log::test;

    use super::*;
    use crate::proposition::{temporal_valuation, Toggles};
    use crate::state::StateSpace;

    fn satisfiable(n: usize, m: usize, formula: &str) -> bool {
        let formula: Formula = formula.parse().unwrap();
        let mut solver = SimpleSatSolver::new();
        let frame = BimodalFrame::new(&mut solver, StateSpace::new(n), m, &Deadline::none()).unwrap();
        let atoms = formula.atoms().into_iter().collect_vec();
        let valuation = temporal_valuation(&mut solver, &frame, &atoms, Toggles::default());
        let mut encoder = BimodalEncoder::new(&mut solver, frame, valuation);
        let x = encoder.truth_at_eval(&mut solver, &formula).unwrap();
        solver.add_unit(x);
        solver.solve() == SolveResponse::Sat
    }

    #[test]
    fn test_modal_axioms() {
        // T
        assert!(!satisfiable(1, 1, "(\\Box A \\wedge \\neg A)"));
        assert!(satisfiable(1, 1, "(\\Diamond A \\wedge \\neg A)"));
        // 5
        assert!(!satisfiable(2, 2, "(\\Diamond A \\wedge \\neg \\Box \\Diamond A)"));
    }

    #[test]
    fn test_tense_operators() {
        assert!(satisfiable(1, 2, "(\\Future A \\wedge \\neg A)"));
        assert!(!satisfiable(1, 2, "(\\Future A \\wedge \\future \\neg A)"));
        assert!(!satisfiable(1, 2, "(\\past A \\wedge \\Past \\neg A)"));
        // With one time point nothing lies in the future
        assert!(!satisfiable(1, 1, "\\future \\top"));
        assert!(satisfiable(1, 1, "\\Future \\bot"));
    }

    #[test]
    fn test_time_shift_makes_futures_possible() {
        // What will be the case is possible now on a shifted history
        assert!(!satisfiable(1, 2, "(\\future A \\wedge \\neg \\Diamond A)"));
        assert!(!satisfiable(1, 2, "(\\past A \\wedge \\neg \\Diamond A)"));
        assert!(satisfiable(1, 2, "(\\future A \\wedge \\neg A)"));
    }

    #[test]
    fn test_counterfactuals_are_unsupported() {
        let formula: Formula = "(A \\boxright B)".parse().unwrap();
        let mut solver = SimpleSatSolver::new();
        let frame = BimodalFrame::new(&mut solver, StateSpace::new(1), 1, &Deadline::none()).unwrap();
        let mut encoder = BimodalEncoder::new(&mut solver, frame, BTreeMap::new());
        let result = encoder.truth_at_eval(&mut solver, &formula);
        assert!(matches!(result, Err(CheckError::UnsupportedOperator { theory, .. }) if theory == "bimodal"));
    }
}
