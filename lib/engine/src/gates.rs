//! Hash-consed and/or/iff gates with constant folding.
//!
//! The encoders build the same small conjunctions many times over (the same
//! pair of contents compared at every world, the same part relation reused by
//! several operators). Routing every gate through one table gives each distinct
//! gate a single output literal.

use std::collections::HashMap;

use itertools::Itertools;

use modal_nexus_core::lit::Lit;
use modal_nexus_core::op::ops::Ops;
use modal_nexus_core::solver::Solver;

#[derive(Debug)]
pub struct Gates {
    top: Lit,
    ands: HashMap<Vec<Lit>, Lit>,
    iffs: HashMap<(Lit, Lit), Lit>,
}

impl Gates {
    pub fn new<S>(solver: &mut S) -> Self
    where
        S: Solver,
    {
        Self {
            top: solver.new_true(),
            ands: HashMap::new(),
            iffs: HashMap::new(),
        }
    }

    /// Literal fixed to `value`.
    pub fn constant(&self, value: bool) -> Lit {
        if value {
            self.top
        } else {
            -self.top
        }
    }

    pub fn num_gates(&self) -> usize {
        self.ands.len() + self.iffs.len()
    }

    /// `AND(xs)`. The empty conjunction is true.
    pub fn and<S, I>(&mut self, solver: &mut S, xs: I) -> Lit
    where
        S: Solver,
        I: IntoIterator<Item = Lit>,
    {
        let mut lits = Vec::new();
        for x in xs {
            if x == -self.top {
                return -self.top;
            }
            if x != self.top {
                lits.push(x);
            }
        }
        lits.sort_by_key(|x| (x.var(), x.get()));
        lits.dedup();
        // After dedup, two literals over one variable are complementary
        if lits.iter().tuple_windows().any(|(a, b)| a.var() == b.var()) {
            return -self.top;
        }
        match lits.as_slice() {
            [] => self.top,
            [x] => *x,
            _ => {
                if let Some(&y) = self.ands.get(&lits) {
                    return y;
                }
                let y = solver.new_var();
                solver.iff_and(y, lits.iter().copied());
                self.ands.insert(lits, y);
                y
            }
        }
    }

    /// `OR(xs)`. The empty disjunction is false.
    pub fn or<S, I>(&mut self, solver: &mut S, xs: I) -> Lit
    where
        S: Solver,
        I: IntoIterator<Item = Lit>,
    {
        -self.and(solver, xs.into_iter().map(|x| -x))
    }

    /// `x1 <=> x2`
    pub fn iff<S>(&mut self, solver: &mut S, x1: Lit, x2: Lit) -> Lit
    where
        S: Solver,
    {
        if x1 == x2 {
            return self.top;
        }
        if x1 == -x2 {
            return -self.top;
        }
        for (a, b) in [(x1, x2), (x2, x1)] {
            if a.abs() == self.top {
                return if a == self.top { b } else { -b };
            }
        }
        // (-a <=> b) is -(a <=> b)
        let negated = x1.is_positive() != x2.is_positive();
        let key = if x1.var() < x2.var() {
            (x1.abs(), x2.abs())
        } else {
            (x2.abs(), x1.abs())
        };
        let y = match self.iffs.get(&key) {
            Some(&y) => y,
            None => {
                let y = solver.new_var();
                solver.iff_iff(y, key.0, key.1);
                self.iffs.insert(key, y);
                y
            }
        };
        if negated {
            -y
        } else {
            y
        }
    }
}

#[cfg(test)]
mod tests {
    use modal_nexus_core::solver::{SolveResponse, SolverExt};
    use modal_nexus_wrappers::simplesat::SimpleSatSolver;
    use test_log::test;

    use super::*;

    #[test]
    fn test_constants_fold() {
        let mut solver = SimpleSatSolver::new();
        let mut gates = Gates::new(&mut solver);
        let x = solver.new_var();
        let (t, f) = (gates.constant(true), gates.constant(false));
        assert_eq!(gates.and(&mut solver, []), t);
        assert_eq!(gates.or(&mut solver, []), f);
        assert_eq!(gates.and(&mut solver, [x, t]), x);
        assert_eq!(gates.and(&mut solver, [x, f]), f);
        assert_eq!(gates.or(&mut solver, [x, t]), t);
        assert_eq!(gates.and(&mut solver, [x, -x]), f);
        assert_eq!(gates.or(&mut solver, [x, -x]), t);
        assert_eq!(gates.iff(&mut solver, x, t), x);
        assert_eq!(gates.iff(&mut solver, f, x), -x);
        assert_eq!(gates.iff(&mut solver, x, -x), f);
        assert_eq!(gates.num_gates(), 0);
    }

    #[test]
    fn test_gates_are_shared() {
        let mut solver = SimpleSatSolver::new();
        let mut gates = Gates::new(&mut solver);
        let xs = solver.new_var_vec(3);
        let a = gates.and(&mut solver, [xs[0], xs[1], xs[2]]);
        let b = gates.and(&mut solver, [xs[2], xs[0], xs[1], xs[0]]);
        assert_eq!(a, b);
        // De Morgan: OR(-xs) is the negation of the same gate
        assert_eq!(gates.or(&mut solver, xs.iter().map(|&x| -x)), -a);

        let e = gates.iff(&mut solver, xs[0], xs[1]);
        assert_eq!(gates.iff(&mut solver, xs[1], xs[0]), e);
        assert_eq!(gates.iff(&mut solver, -xs[0], -xs[1]), e);
        assert_eq!(gates.iff(&mut solver, -xs[0], xs[1]), -e);
        assert_eq!(gates.num_gates(), 2);
    }

    #[test]
    fn test_gate_semantics() {
        let mut solver = SimpleSatSolver::new();
        let mut gates = Gates::new(&mut solver);
        let xs = solver.new_var_vec(2);
        let and = gates.and(&mut solver, xs.clone());
        let or = gates.or(&mut solver, xs.clone());
        let iff = gates.iff(&mut solver, xs[0], xs[1]);
        for (v0, v1) in [(false, false), (false, true), (true, false), (true, true)] {
            let lit = |x: Lit, v: bool| if v { x } else { -x };
            solver.assume(lit(xs[0], v0));
            solver.assume(lit(xs[1], v1));
            assert_eq!(solver.solve(), SolveResponse::Sat);
            assert_eq!(solver.value(and).bool(), v0 && v1);
            assert_eq!(solver.value(or).bool(), v0 || v1);
            assert_eq!(solver.value(iff).bool(), v0 == v1);
        }
    }
}
