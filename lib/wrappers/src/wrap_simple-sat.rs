use std::fmt::{Debug, Display, Formatter};

use itertools::Itertools;
use tap::Pipe;

use modal_nexus_core::lit::Lit;
use modal_nexus_core::solver::{LitValue, SearchLimits, SolveResponse, SolveStats, Solver};
use simple_sat::assignment::LBool;
use simple_sat::budget::Budget;
use simple_sat::lit::Lit as SimpleSatLit;
use simple_sat::solver::{SolveResult, Solver as SimpleSat};

pub struct SimpleSatSolver {
    inner: SimpleSat,
    assumptions: Vec<SimpleSatLit>,
}

impl SimpleSatSolver {
    pub fn new() -> Self {
        Self {
            inner: SimpleSat::default(),
            assumptions: Vec::new(),
        }
    }
}

impl Default for SimpleSatSolver {
    fn default() -> Self {
        SimpleSatSolver::new()
    }
}

impl Debug for SimpleSatSolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleSatSolver").field("inner", &self.inner).finish()
    }
}

impl Display for SimpleSatSolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", tynm::type_name::<Self>(), self.inner)
    }
}

impl Solver for SimpleSatSolver {
    fn num_vars(&self) -> usize {
        self.inner.num_vars()
    }
    fn num_clauses(&self) -> usize {
        self.inner.num_clauses()
    }

    fn new_var(&mut self) -> Lit {
        let var = self.inner.new_var();
        let lit = SimpleSatLit::positive(var);
        from_ss(lit)
    }

    fn assume<L>(&mut self, lit: L)
    where
        L: Into<Lit>,
    {
        self.assumptions.push(lit.into().pipe(to_ss));
    }

    fn add_clause<I>(&mut self, lits: I)
    where
        I: IntoIterator,
        I::Item: Into<Lit>,
    {
        let lits = lits.into_iter().map_into::<Lit>().map(to_ss).collect_vec();
        self.inner.add_clause(&lits);
    }

    fn set_limits(&mut self, limits: SearchLimits) {
        self.inner.set_budget(Budget {
            deadline: limits.deadline,
            interrupt: limits.interrupt,
        });
    }

    fn solve(&mut self) -> SolveResponse {
        let assumptions = std::mem::take(&mut self.assumptions);
        match self.inner.solve_under_assumptions(&assumptions) {
            SolveResult::Sat => SolveResponse::Sat,
            SolveResult::Unsat => SolveResponse::Unsat,
            SolveResult::Unknown => SolveResponse::Unknown,
        }
    }

    fn value<L>(&self, lit: L) -> LitValue
    where
        L: Into<Lit>,
    {
        match self.inner.value(lit.into().pipe(to_ss)) {
            LBool::True => LitValue::True,
            LBool::False => LitValue::False,
            LBool::Undef => LitValue::Undefined,
        }
    }

    fn stats(&self) -> SolveStats {
        let stats = self.inner.stats();
        SolveStats {
            conflicts: stats.conflicts,
            decisions: stats.decisions,
            propagations: stats.propagations,
        }
    }
}

fn to_ss(lit: Lit) -> SimpleSatLit {
    let lit = lit.get();
    debug_assert_ne!(lit, 0, "Literal must be non-zero");
    SimpleSatLit::from_external(lit)
}

fn from_ss(lit: SimpleSatLit) -> Lit {
    let lit = lit.to_external();
    debug_assert_ne!(lit, 0, "Literal must be non-zero");
    Lit::from(lit)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn test_wrap_simple_sat() -> color_eyre::Result<()> {
        let mut solver = SimpleSatSolver::new();
        assert_eq!(solver.to_string(), "SimpleSatSolver(Solver(vars=0, clauses=0, learnts=0, conflicts=0))");

        // Initializing variables
        let a = solver.new_var();
        let b = solver.new_var();
        let c = solver.new_var();
        let d = solver.new_var();
        assert_eq!(solver.num_vars(), 4);
        assert_eq!(a.get(), 1);
        assert_eq!(d.get(), 4);

        // Adding [(a or b) and (c or d) and not(a and b) and not(c and d)]
        solver.add_clause([a, b]);
        solver.add_clause(&[c, d]);
        solver.add_clause(vec![-a, -b]);
        solver.add_clause(&vec![-c, -d]);

        // Problem is satisfiable
        let response = solver.solve();
        assert_eq!(response, SolveResponse::Sat);
        assert_ne!(solver.value(a), solver.value(b));

        // Assuming both a and b to be true
        solver.assume(a);
        solver.assume(b);
        // Problem is unsatisfiable under assumptions
        let response = solver.solve();
        assert_eq!(response, SolveResponse::Unsat);
        assert_eq!(solver.value(a), LitValue::Undefined);

        // `solve` resets assumptions, so calling it again should produce SAT
        let response = solver.solve();
        assert_eq!(response, SolveResponse::Sat);

        Ok(())
    }

    #[test]
    fn test_limits_give_unknown() {
        let mut solver = SimpleSatSolver::new();
        // 5 pigeons, 4 holes
        let x = |p: i32, h: i32| Lit::new(p * 4 + h + 1);
        for p in 0..5 {
            solver.add_clause((0..4).map(|h| x(p, h)));
        }
        for h in 0..4 {
            for p1 in 0..5 {
                for p2 in (p1 + 1)..5 {
                    solver.add_clause([-x(p1, h), -x(p2, h)]);
                }
            }
        }
        solver.set_limits(SearchLimits {
            deadline: Some(Instant::now()),
            interrupt: None,
        });
        assert_eq!(solver.solve(), SolveResponse::Unknown);

        solver.set_limits(SearchLimits::unlimited());
        assert_eq!(solver.solve(), SolveResponse::Unsat);
        let stats = solver.stats();
        assert!(stats.conflicts > 0);
        assert!(stats.propagations > 0);
    }
}
