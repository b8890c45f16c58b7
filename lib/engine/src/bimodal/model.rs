use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use formula_parser::{Atom, BinaryOp, Formula, UnaryOp};
use modal_nexus_core::solver::Solver;

use crate::bimodal::BimodalEncoder;
use crate::error::*;
use crate::state::{State, StateSpace};

/// Snapshot of a bimodal model: the active histories and the atom valuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BimodalModel {
    pub space: StateSpace,
    pub m: usize,
    /// World-states of each active history by time index; the main history comes first.
    pub histories: Vec<Vec<State>>,
    /// Atom to the world-states it is true at.
    pub valuation: BTreeMap<Atom, BTreeSet<State>>,
}

impl BimodalModel {
    pub fn extract<S>(solver: &S, encoder: &BimodalEncoder) -> Result<Self>
    where
        S: Solver,
    {
        let frame = &encoder.frame;
        let mut histories = Vec::new();
        for h in (0..frame.num_histories()).filter(|&h| solver.value(frame.active[h]).is_true()) {
            let mut history = Vec::with_capacity(frame.num_times());
            for t in 0..frame.num_times() {
                match frame.state[[h, t]].eval(solver) {
                    Some(s) => history.push(s),
                    None => {
                        return InfeasibleFrameSnafu {
                            reason: format!("history {} has no state at time {}", h, frame.time(t)),
                        }
                        .fail()
                    }
                }
            }
            histories.push(history);
        }
        let valuation = encoder
            .valuation
            .iter()
            .map(|(&atom, val)| {
                let states = frame.space.states().filter(|s| solver.value(val[s.index()]).is_true()).collect();
                (atom, states)
            })
            .collect();
        Ok(Self {
            space: frame.space,
            m: frame.m,
            histories,
            valuation,
        })
    }

    /// Main history, the set of the other histories, and the valuation.
    /// The order in which the other histories were found does not matter.
    pub fn structure(&self) -> (&[State], BTreeSet<&[State]>, &BTreeMap<Atom, BTreeSet<State>>) {
        let main = self.histories.first().map_or(&[][..], |h| h.as_slice());
        let others = self.histories.iter().skip(1).map(|h| h.as_slice()).collect();
        (main, others, &self.valuation)
    }

    fn num_times(&self) -> usize {
        2 * self.m - 1
    }

    pub fn now(&self) -> usize {
        self.m - 1
    }

    /// Truth of `formula` on history `h` at time index `t`.
    pub fn is_true(&self, formula: &Formula, h: usize, t: usize) -> Result<bool> {
        Ok(match formula {
            Formula::Atom(atom) => self
                .valuation
                .get(atom)
                .map_or(false, |val| val.contains(&self.histories[h][t])),
            Formula::Top => true,
            Formula::Bot => false,
            Formula::Unary(UnaryOp::Neg, arg) => !self.is_true(arg, h, t)?,
            Formula::Unary(UnaryOp::Box, arg) => self.all(0..self.histories.len(), |h2| self.is_true(arg, h2, t))?,
            Formula::Unary(UnaryOp::Diamond, arg) => !self.all(0..self.histories.len(), |h2| Ok(!self.is_true(arg, h2, t)?))?,
            Formula::Unary(UnaryOp::Future, arg) => self.all(t + 1..self.num_times(), |t2| self.is_true(arg, h, t2))?,
            Formula::Unary(UnaryOp::SomeFuture, arg) => !self.all(t + 1..self.num_times(), |t2| Ok(!self.is_true(arg, h, t2)?))?,
            Formula::Unary(UnaryOp::Past, arg) => self.all(0..t, |t2| self.is_true(arg, h, t2))?,
            Formula::Unary(UnaryOp::SomePast, arg) => !self.all(0..t, |t2| Ok(!self.is_true(arg, h, t2)?))?,
            Formula::Binary(BinaryOp::And, lhs, rhs) => self.is_true(lhs, h, t)? && self.is_true(rhs, h, t)?,
            Formula::Binary(BinaryOp::Or, lhs, rhs) => self.is_true(lhs, h, t)? || self.is_true(rhs, h, t)?,
            other => {
                return UnsupportedOperatorSnafu {
                    theory: "bimodal",
                    operator: other.operator().map_or_else(|| other.to_string(), |op| op.to_string()),
                }
                .fail()
            }
        })
    }

    fn all<I, F>(&self, range: I, mut pred: F) -> Result<bool>
    where
        I: IntoIterator<Item = usize>,
        F: FnMut(usize) -> Result<bool>,
    {
        for i in range {
            if !pred(i)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Display for BimodalModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Histories (N = {}, M = {}):", self.space.n(), self.m)?;
        for (h, history) in self.histories.iter().enumerate() {
            let marker = if h == 0 { "*" } else { " " };
            let slices = history
                .iter()
                .enumerate()
                .map(|(t, s)| format!("{:+}:{}", t as i32 - self.now() as i32, s))
                .join(" -> ");
            writeln!(f, " {}h{} {}", marker, h, slices)?;
        }
        writeln!(f, "Propositions:")?;
        for (atom, states) in self.valuation.iter() {
            writeln!(f, "  |{}| = {{{}}}", atom, states.iter().join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> BimodalModel {
        let [n, a, b] = [0b00, 0b01, 0b10].map(State::new);
        BimodalModel {
            space: StateSpace::new(2),
            m: 2,
            histories: vec![vec![a, b, b], vec![b, b, n], vec![n, a, b]],
            valuation: BTreeMap::from([(Atom::new('A').unwrap(), BTreeSet::from([a]))]),
        }
    }

    #[test]
    fn test_tense_truth() {
        let m = model();
        let a = Formula::atom('A');
        let now = m.now();
        assert!(!m.is_true(&a, 0, now).unwrap());
        assert!(m.is_true(&Formula::unary(UnaryOp::SomePast, a.clone()), 0, now).unwrap());
        assert!(m.is_true(&Formula::unary(UnaryOp::Future, Formula::not(a.clone())), 0, now).unwrap());
        assert!(m.is_true(&Formula::possibly(a.clone()), 0, now).unwrap());
        assert!(!m.is_true(&Formula::necessarily(a), 0, now).unwrap());
    }

    #[test]
    fn test_display_marks_main_history() {
        let text = model().to_string();
        assert!(text.contains("*h0 -1:a -> +0:b -> +1:b"), "{}", text);
        assert!(text.contains("|A| = {a}"));
    }

    #[test]
    fn test_unsupported() {
        let m = model();
        let f = Formula::would(Formula::atom('A'), Formula::Top);
        assert!(m.is_true(&f, 0, 1).is_err());
    }
}
