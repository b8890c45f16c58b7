use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use formula_parser::{Atom, BinaryOp, Formula, UnaryOp};
use modal_nexus_core::lit::Lit;
use modal_nexus_core::solver::Solver;

use crate::error::*;
use crate::hyper::HyperEncoder;
use crate::state::{State, StateSpace};

pub type StateSet = BTreeSet<State>;

/// Snapshot of a hyperintensional model, evaluated directly over state sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperModel {
    pub space: StateSpace,
    pub possible: StateSet,
    pub eval_world: State,
    /// Atom to `(verifiers, falsifiers)`.
    pub valuation: BTreeMap<Atom, (StateSet, StateSet)>,
}

impl HyperModel {
    pub fn extract<S>(solver: &S, encoder: &HyperEncoder) -> Result<Self>
    where
        S: Solver,
    {
        let frame = &encoder.frame;
        let space = frame.space;
        let holds = |lit: Lit| solver.value(lit).is_true();
        let possible = space.states().filter(|&s| holds(frame.possible(s))).collect();
        let eval_world = match frame.eval.eval(solver) {
            Some(w) => w,
            None => {
                return InfeasibleFrameSnafu {
                    reason: "model has no evaluation world",
                }
                .fail()
            }
        };
        let valuation = encoder
            .valuation
            .iter()
            .map(|(&atom, content)| {
                let ver = space.states().filter(|&s| holds(content.ver(s))).collect();
                let fal = space.states().filter(|&s| holds(content.fal(s))).collect();
                (atom, (ver, fal))
            })
            .collect();
        Ok(Self {
            space,
            possible,
            eval_world,
            valuation,
        })
    }

    /// The part of the model that iteration keeps distinct: the possible states and
    /// the contents of every atom. Models that differ only in the evaluation world
    /// count as the same.
    pub fn structure(&self) -> (&StateSet, &BTreeMap<Atom, (StateSet, StateSet)>) {
        (&self.possible, &self.valuation)
    }

    pub fn is_possible(&self, s: State) -> bool {
        self.possible.contains(&s)
    }

    pub fn is_world(&self, s: State) -> bool {
        self.is_possible(s) && self.space.supersets(s).all(|t| t == s || !self.is_possible(t))
    }

    pub fn worlds(&self) -> Vec<State> {
        self.space.states().filter(|&s| self.is_world(s)).collect()
    }

    /// Maximal parts of `w` whose fusion with `x` is possible.
    pub fn maximal_compatible_parts(&self, w: State, x: State) -> Vec<State> {
        let compatible = self
            .space
            .parts(w)
            .filter(|z| self.is_possible(z.fusion(x)))
            .collect_vec();
        compatible
            .iter()
            .copied()
            .filter(|z| !compatible.iter().any(|y| z.is_proper_part_of(*y)))
            .collect()
    }

    /// Worlds `u` containing `x` and some maximal `x`-compatible part of `w`.
    pub fn alternatives(&self, w: State, x: State) -> Vec<State> {
        let parts = self.maximal_compatible_parts(w, x);
        self.worlds()
            .into_iter()
            .filter(|&u| x.is_part_of(u) && parts.iter().any(|z| z.is_part_of(u)))
            .collect()
    }

    /// `(verifiers, falsifiers)` of `formula` at `w`.
    pub fn content(&self, formula: &Formula, w: State) -> Result<(StateSet, StateSet)> {
        let fusions = |xs: &StateSet, ys: &StateSet| -> StateSet {
            xs.iter().cartesian_product(ys.iter()).map(|(x, y)| x.fusion(*y)).collect()
        };
        Ok(match formula {
            Formula::Atom(atom) => self.valuation.get(atom).cloned().unwrap_or_default(),
            Formula::Top => (self.space.states().collect(), StateSet::new()),
            Formula::Bot => (StateSet::new(), self.space.states().collect()),
            Formula::Unary(UnaryOp::Neg, arg) => {
                let (ver, fal) = self.content(arg, w)?;
                (fal, ver)
            }
            Formula::Binary(BinaryOp::And, lhs, rhs) => {
                let (ver_a, fal_a) = self.content(lhs, w)?;
                let (ver_b, fal_b) = self.content(rhs, w)?;
                let fal = fal_a.union(&fal_b).copied().chain(fusions(&fal_a, &fal_b)).collect();
                (fusions(&ver_a, &ver_b), fal)
            }
            Formula::Binary(BinaryOp::Or, lhs, rhs) => {
                let (ver_a, fal_a) = self.content(lhs, w)?;
                let (ver_b, fal_b) = self.content(rhs, w)?;
                let ver = ver_a.union(&ver_b).copied().chain(fusions(&ver_a, &ver_b)).collect();
                (ver, fusions(&fal_a, &fal_b))
            }
            _ => {
                let null = StateSet::from([State::NULL]);
                if self.is_true(formula, w)? {
                    (null, StateSet::new())
                } else {
                    (StateSet::new(), null)
                }
            }
        })
    }

    pub fn is_true(&self, formula: &Formula, w: State) -> Result<bool> {
        Ok(match formula {
            Formula::Atom(_) => {
                let (ver, _) = self.content(formula, w)?;
                ver.iter().any(|v| v.is_part_of(w))
            }
            Formula::Top => true,
            Formula::Bot => false,
            Formula::Unary(UnaryOp::Neg, arg) => !self.is_true(arg, w)?,
            Formula::Unary(UnaryOp::Box, arg) => {
                for u in self.worlds() {
                    if !self.is_true(arg, u)? {
                        return Ok(false);
                    }
                }
                true
            }
            Formula::Unary(UnaryOp::Diamond, arg) => {
                for u in self.worlds() {
                    if self.is_true(arg, u)? {
                        return Ok(true);
                    }
                }
                false
            }
            Formula::Binary(BinaryOp::And, lhs, rhs) => self.is_true(lhs, w)? && self.is_true(rhs, w)?,
            Formula::Binary(BinaryOp::Or, lhs, rhs) => self.is_true(lhs, w)? || self.is_true(rhs, w)?,
            Formula::Binary(op @ (BinaryOp::BoxRight | BinaryOp::DiamondRight), lhs, rhs) => {
                let (ver, _) = self.content(lhs, w)?;
                let mut outcomes = Vec::new();
                for &x in &ver {
                    for u in self.alternatives(w, x) {
                        outcomes.push(self.is_true(rhs, u)?);
                    }
                }
                match op {
                    BinaryOp::BoxRight => outcomes.into_iter().all(|b| b),
                    _ => outcomes.into_iter().any(|b| b),
                }
            }
            Formula::Binary(BinaryOp::Ground, lhs, rhs) => {
                let a = self.content(lhs, w)?;
                let b = self.content(rhs, w)?;
                grounds(&a, &b)
            }
            Formula::Binary(BinaryOp::Essence, lhs, rhs) => {
                let (ver_a, fal_a) = self.content(lhs, w)?;
                let (ver_b, fal_b) = self.content(rhs, w)?;
                grounds(&(fal_a, ver_a), &(fal_b, ver_b))
            }
            Formula::Binary(BinaryOp::Identity, lhs, rhs) => self.content(lhs, w)? == self.content(rhs, w)?,
            other => {
                return UnsupportedOperatorSnafu {
                    theory: "counterfactual",
                    operator: other.operator().map_or_else(|| other.to_string(), |op| op.to_string()),
                }
                .fail()
            }
        })
    }
}

fn grounds((ver_a, fal_a): &(StateSet, StateSet), (ver_b, fal_b): &(StateSet, StateSet)) -> bool {
    ver_a.is_subset(ver_b)
        && fal_a
            .iter()
            .cartesian_product(fal_b.iter())
            .all(|(x, y)| fal_b.contains(&x.fusion(*y)))
        && fal_b.iter().all(|y| fal_a.iter().any(|x| x.is_part_of(*y)))
}

impl Display for HyperModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let states = |set: &StateSet| set.iter().join(", ");
        writeln!(f, "State space (N = {}):", self.space.n())?;
        let worlds = self.worlds();
        for s in self.possible.iter() {
            let kind = if *s == self.eval_world {
                "evaluation world"
            } else if worlds.contains(s) {
                "world"
            } else {
                "possible"
            };
            writeln!(f, "  {} ({})", s, kind)?;
        }
        writeln!(f, "Propositions:")?;
        for (atom, (ver, fal)) in self.valuation.iter() {
            writeln!(f, "  |{}| = < {{{}}}, {{{}}} >", atom, states(ver), states(fal))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(bits: u32) -> State {
        State::new(bits)
    }

    fn model() -> HyperModel {
        // a, b and c are possible; ab and bc are worlds; ac is impossible
        let possible = [0b000, 0b001, 0b010, 0b100, 0b011, 0b110].map(s).into();
        let a = (StateSet::from([s(0b001)]), StateSet::from([s(0b100)]));
        HyperModel {
            space: StateSpace::new(3),
            possible,
            eval_world: s(0b011),
            valuation: BTreeMap::from([(Atom::new('A').unwrap(), a)]),
        }
    }

    #[test]
    fn test_worlds() {
        assert_eq!(model().worlds(), vec![s(0b011), s(0b110)]);
    }

    #[test]
    fn test_alternatives() {
        let m = model();
        // Imposing `c` on `ab` keeps the `b` part
        assert_eq!(m.maximal_compatible_parts(s(0b011), s(0b100)), vec![s(0b010)]);
        assert_eq!(m.alternatives(s(0b011), s(0b100)), vec![s(0b110)]);
        // Imposing a part of the world changes nothing
        assert_eq!(m.alternatives(s(0b011), s(0b001)), vec![s(0b011)]);
    }

    #[test]
    fn test_truth() {
        let m = model();
        let a = Formula::atom('A');
        assert!(m.is_true(&a, s(0b011)).unwrap());
        assert!(!m.is_true(&a, s(0b110)).unwrap());
        assert!(m.is_true(&Formula::possibly(Formula::not(a.clone())), s(0b011)).unwrap());
        let would = Formula::would(Formula::not(a.clone()), Formula::not(a));
        assert!(m.is_true(&would, s(0b011)).unwrap());
    }

    #[test]
    fn test_conjunction_content() {
        let m = model();
        let a = Formula::atom('A');
        let (ver, fal) = m.content(&Formula::and(a.clone(), Formula::Top), s(0)).unwrap();
        assert_eq!(ver.len(), 4);
        assert!(fal.contains(&s(0b100)));
        assert!(m.is_true(&Formula::binary(BinaryOp::Ground, a.clone(), a), s(0)).unwrap());
    }
}
