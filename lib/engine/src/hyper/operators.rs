use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use log::debug;
use ndarray::Array1;

use formula_parser::{Atom, BinaryOp, Formula, UnaryOp};
use modal_nexus_core::lit::Lit;
use modal_nexus_core::op::ops::Ops;
use modal_nexus_core::solver::Solver;

use crate::deadline::Deadline;
use crate::error::*;
use crate::gates::Gates;
use crate::hyper::HyperFrame;
use crate::proposition::Content;
use crate::state::{State, StateSpace};

/// Translates formulas into verifier/falsifier contents and truth literals
/// over a [`HyperFrame`].
///
/// Contents of formulas without counterfactuals do not depend on the
/// evaluation world and are shared between all worlds, and so are the truths
/// of modal and constitutive formulas.
#[derive(Debug)]
pub struct HyperEncoder {
    pub frame: HyperFrame,
    pub valuation: BTreeMap<Atom, Content>,
    gates: Gates,
    deadline: Deadline,
    contents: HashMap<(Formula, Option<State>), Content>,
    truths: HashMap<(Formula, Option<State>), Lit>,
    /// Maximal compatible parts: `(z, w, x)`.
    mcp: HashMap<(State, State, State), Lit>,
    /// Alternatives: `(w, x, u)`.
    alt: HashMap<(State, State, State), Lit>,
}

impl HyperEncoder {
    pub fn new<S>(solver: &mut S, frame: HyperFrame, valuation: BTreeMap<Atom, Content>) -> Self
    where
        S: Solver,
    {
        Self {
            frame,
            valuation,
            gates: Gates::new(solver),
            deadline: Deadline::none(),
            contents: HashMap::new(),
            truths: HashMap::new(),
            mcp: HashMap::new(),
            alt: HashMap::new(),
        }
    }

    /// Give up with `Timeout` once `deadline` passes.
    pub fn with_deadline(self, deadline: Deadline) -> Self {
        Self { deadline, ..self }
    }

    fn space(&self) -> StateSpace {
        self.frame.space
    }

    fn constant(&self, value: bool) -> Array1<Lit> {
        Array1::from_elem(self.space().len(), self.gates.constant(value))
    }

    /// Literal that holds iff `formula` is true at the evaluation world.
    pub fn truth_at_eval<S>(&mut self, solver: &mut S, formula: &Formula) -> Result<Lit>
    where
        S: Solver,
    {
        let num_vars = solver.num_vars();
        let x = if is_rigid(formula) {
            self.truth(solver, formula, State::NULL)?
        } else {
            let x = solver.new_var();
            for w in self.space().states().collect_vec() {
                let t = self.truth(solver, formula, w)?;
                solver.imply_iff(self.frame.eval.eq(w), x, t);
            }
            x
        };
        debug!(
            "Encoded `{}` using {} variables ({} shared gates so far)",
            formula,
            solver.num_vars() - num_vars,
            self.gates.num_gates()
        );
        Ok(x)
    }

    /// Literal for "`formula` is true at `w`", meaningful when `w` is a world.
    pub fn truth<S>(&mut self, solver: &mut S, formula: &Formula, w: State) -> Result<Lit>
    where
        S: Solver,
    {
        let key = (formula.clone(), (!is_rigid(formula)).then_some(w));
        if let Some(&lit) = self.truths.get(&key) {
            return Ok(lit);
        }
        self.deadline.check()?;
        let lit = match formula {
            Formula::Atom(atom) => {
                let content = self.atom(atom)?;
                let parts = self.space().parts(w).map(|v| content.ver(v)).collect_vec();
                self.gates.or(solver, parts)
            }
            Formula::Top => self.gates.constant(true),
            Formula::Bot => self.gates.constant(false),
            Formula::Unary(UnaryOp::Neg, arg) => -self.truth(solver, arg, w)?,
            Formula::Unary(UnaryOp::Box, arg) => {
                // World-independent
                let mut conjuncts = Vec::new();
                for u in self.space().states() {
                    let t = self.truth(solver, arg, u)?;
                    conjuncts.push(self.gates.or(solver, [-self.frame.world(u), t]));
                }
                self.gates.and(solver, conjuncts)
            }
            Formula::Unary(UnaryOp::Diamond, arg) => {
                let mut disjuncts = Vec::new();
                for u in self.space().states() {
                    let t = self.truth(solver, arg, u)?;
                    disjuncts.push(self.gates.and(solver, [self.frame.world(u), t]));
                }
                self.gates.or(solver, disjuncts)
            }
            Formula::Binary(BinaryOp::And, lhs, rhs) => {
                let a = self.truth(solver, lhs, w)?;
                let b = self.truth(solver, rhs, w)?;
                self.gates.and(solver, [a, b])
            }
            Formula::Binary(BinaryOp::Or, lhs, rhs) => {
                let a = self.truth(solver, lhs, w)?;
                let b = self.truth(solver, rhs, w)?;
                self.gates.or(solver, [a, b])
            }
            Formula::Binary(op @ (BinaryOp::BoxRight | BinaryOp::DiamondRight), lhs, rhs) => {
                let would = *op == BinaryOp::BoxRight;
                let antecedent = self.content(solver, lhs, w)?;
                let mut cases = Vec::new();
                for u in self.space().states() {
                    self.deadline.check()?;
                    let t = self.truth(solver, rhs, u)?;
                    let consequent = if would { -t } else { t };
                    for x in self.space().parts(u) {
                        if antecedent.ver(x) == self.gates.constant(false) {
                            continue;
                        }
                        let alt = self.alternative(solver, w, x, u);
                        cases.push(self.gates.and(solver, [antecedent.ver(x), alt, consequent]));
                    }
                }
                // Would: no alternative where the consequent fails. Might: some alternative where it holds.
                let some = self.gates.or(solver, cases);
                if would {
                    -some
                } else {
                    some
                }
            }
            Formula::Binary(op @ (BinaryOp::Ground | BinaryOp::Essence | BinaryOp::Identity), lhs, rhs) => {
                let a = self.content(solver, lhs, w)?;
                let b = self.content(solver, rhs, w)?;
                match op {
                    BinaryOp::Ground => self.grounds(solver, &a, &b)?,
                    BinaryOp::Essence => self.grounds(solver, &a.swapped(), &b.swapped())?,
                    _ => self.identical(solver, &a, &b),
                }
            }
            other => return unsupported(other),
        };
        self.truths.insert(key, lit);
        Ok(lit)
    }

    /// Verifier/falsifier content of `formula`, evaluated at `w` where that matters.
    pub fn content<S>(&mut self, solver: &mut S, formula: &Formula, w: State) -> Result<Content>
    where
        S: Solver,
    {
        let index = is_world_dependent(formula).then_some(w);
        if let Some(content) = self.contents.get(&(formula.clone(), index)) {
            return Ok(content.clone());
        }
        let content = match formula {
            Formula::Atom(atom) => self.atom(atom)?.clone(),
            Formula::Top => Content {
                ver: self.constant(true),
                fal: self.constant(false),
            },
            Formula::Bot => Content {
                ver: self.constant(false),
                fal: self.constant(true),
            },
            Formula::Unary(UnaryOp::Neg, arg) => self.content(solver, arg, w)?.swapped(),
            Formula::Binary(BinaryOp::And, lhs, rhs) => {
                let a = self.content(solver, lhs, w)?;
                let b = self.content(solver, rhs, w)?;
                Content {
                    ver: self.fusions(solver, &a.ver, &b.ver, false)?,
                    fal: self.fusions(solver, &a.fal, &b.fal, true)?,
                }
            }
            Formula::Binary(BinaryOp::Or, lhs, rhs) => {
                let a = self.content(solver, lhs, w)?;
                let b = self.content(solver, rhs, w)?;
                Content {
                    ver: self.fusions(solver, &a.ver, &b.ver, true)?,
                    fal: self.fusions(solver, &a.fal, &b.fal, false)?,
                }
            }
            _ => {
                // Truth-valued: verified by the null state when true, falsified by it when false
                let t = self.truth(solver, formula, w)?;
                let mut ver = self.constant(false);
                let mut fal = self.constant(false);
                ver[State::NULL.index()] = t;
                fal[State::NULL.index()] = -t;
                Content { ver, fal }
            }
        };
        self.contents.insert((formula.clone(), index), content.clone());
        Ok(content)
    }

    fn atom(&self, atom: &Atom) -> Result<&Content> {
        match self.valuation.get(atom) {
            Some(content) => Ok(content),
            None => InfeasibleFrameSnafu {
                reason: format!("atom {} has no valuation", atom),
            }
            .fail(),
        }
    }

    /// `{a | b : a ∈ xs, b ∈ ys}`, together with `xs ∪ ys` when `union` is set.
    fn fusions<S>(&mut self, solver: &mut S, xs: &Array1<Lit>, ys: &Array1<Lit>, union: bool) -> Result<Array1<Lit>>
    where
        S: Solver,
    {
        let space = self.space();
        let mut lits = Vec::with_capacity(space.len());
        for s in space.states() {
            self.deadline.check()?;
            let mut terms = Vec::new();
            for (a, b) in space.decompositions(s) {
                terms.push(self.gates.and(solver, [xs[a.index()], ys[b.index()]]));
            }
            if union {
                terms.push(xs[s.index()]);
                terms.push(ys[s.index()]);
            }
            lits.push(self.gates.or(solver, terms));
        }
        Ok(Array1::from(lits))
    }

    /// `z` is a maximal part of `w` compatible with `x`.
    fn maximal_compatible_part<S>(&mut self, solver: &mut S, z: State, w: State, x: State) -> Lit
    where
        S: Solver,
    {
        debug_assert!(z.is_part_of(w));
        if let Some(&lit) = self.mcp.get(&(z, w, x)) {
            return lit;
        }
        let frame = &self.frame;
        let lits = std::iter::once(frame.possible(z.fusion(x)))
            .chain(
                self.space()
                    .atoms()
                    .filter(|b| b.is_part_of(w) && !b.is_part_of(z))
                    .map(|b| -frame.possible(z.fusion(b).fusion(x))),
            )
            .collect_vec();
        let lit = self.gates.and(solver, lits);
        self.mcp.insert((z, w, x), lit);
        lit
    }

    /// `u` is an `x`-alternative to `w`. Requires `x ⊑ u`.
    fn alternative<S>(&mut self, solver: &mut S, w: State, x: State, u: State) -> Lit
    where
        S: Solver,
    {
        debug_assert!(x.is_part_of(u));
        if let Some(&lit) = self.alt.get(&(w, x, u)) {
            return lit;
        }
        let common = State::new(u.bits() & w.bits());
        let parts = self
            .space()
            .parts(common)
            .map(|z| self.maximal_compatible_part(solver, z, w, x))
            .collect_vec();
        let some_part = self.gates.or(solver, parts);
        let lit = self.gates.and(solver, [self.frame.world(u), some_part]);
        self.alt.insert((w, x, u), lit);
        lit
    }

    /// `a` grounds `b`: `(a ∨ b)` has the content of `b`.
    fn grounds<S>(&mut self, solver: &mut S, a: &Content, b: &Content) -> Result<Lit>
    where
        S: Solver,
    {
        let space = self.space();
        let mut conditions = Vec::new();
        for s in space.states() {
            conditions.push(self.gates.or(solver, [-a.ver(s), b.ver(s)]));
        }
        for x in space.states() {
            self.deadline.check()?;
            for y in space.states() {
                conditions.push(self.gates.or(solver, [-a.fal(x), -b.fal(y), b.fal(x.fusion(y))]));
            }
        }
        for s in space.states() {
            let parts = std::iter::once(-b.fal(s)).chain(space.parts(s).map(|x| a.fal(x))).collect_vec();
            conditions.push(self.gates.or(solver, parts));
        }
        Ok(self.gates.and(solver, conditions))
    }

    fn identical<S>(&mut self, solver: &mut S, a: &Content, b: &Content) -> Lit
    where
        S: Solver,
    {
        let mut conditions = Vec::new();
        for s in self.space().states() {
            conditions.push(self.gates.iff(solver, a.ver(s), b.ver(s)));
            conditions.push(self.gates.iff(solver, a.fal(s), b.fal(s)));
        }
        self.gates.and(solver, conditions)
    }

    /// Literals that pin down a model: possibility and the contents of atoms.
    /// The evaluation world is left out, so models differing only there count as one.
    pub fn essential(&self) -> Vec<Lit> {
        self.frame
            .possible
            .iter()
            .copied()
            .chain(self.valuation.values().flat_map(|c| c.ver.iter().chain(c.fal.iter()).copied()))
            .collect()
    }
}

/// Whether the truth of `formula` is the same at every world.
pub fn is_rigid(formula: &Formula) -> bool {
    match formula {
        Formula::Top | Formula::Bot => true,
        Formula::Unary(UnaryOp::Neg, arg) => is_rigid(arg),
        Formula::Unary(UnaryOp::Box | UnaryOp::Diamond, _) => true,
        Formula::Binary(BinaryOp::And | BinaryOp::Or, lhs, rhs) => is_rigid(lhs) && is_rigid(rhs),
        Formula::Binary(BinaryOp::Ground | BinaryOp::Essence | BinaryOp::Identity, lhs, rhs) => {
            !is_world_dependent(lhs) && !is_world_dependent(rhs)
        }
        _ => false,
    }
}

/// Whether the content of `formula` depends on the world it is evaluated at.
pub fn is_world_dependent(formula: &Formula) -> bool {
    formula
        .subformulas()
        .into_iter()
        .any(|f| matches!(f, Formula::Binary(BinaryOp::BoxRight | BinaryOp::DiamondRight, _, _)))
}

fn unsupported<T>(formula: &Formula) -> Result<T> {
    let operator = formula.operator().map_or_else(|| formula.to_string(), |op| op.to_string());
    UnsupportedOperatorSnafu {
        theory: "counterfactual",
        operator,
    }
    .fail()
}
