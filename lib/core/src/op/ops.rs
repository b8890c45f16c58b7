use crate::lit::Lit;
use crate::solver::Solver;

impl<S> Ops for S where S: Solver {}

/// Clause-level shorthands. Gates that introduce a fresh output literal are
/// built on top of `iff_and`/`iff_or`/`iff_iff`.
pub trait Ops: Solver {
    /// `lhs => rhs`
    fn imply(&mut self, lhs: Lit, rhs: Lit) {
        self.add_clause([-lhs, rhs]);
    }

    /// `lhs => AND(rhs)`
    fn imply_and<I>(&mut self, lhs: Lit, rhs: I)
    where
        I: IntoIterator<Item = Lit>,
    {
        for x in rhs {
            self.imply(lhs, x);
        }
    }

    /// `lhs => OR(rhs)`
    fn imply_or<I>(&mut self, lhs: Lit, rhs: I)
    where
        I: IntoIterator<Item = Lit>,
    {
        self.add_clause(std::iter::once(-lhs).chain(rhs));
    }

    /// `x1 => (x2 => x3)`
    fn imply_imply(&mut self, x1: Lit, x2: Lit, x3: Lit) {
        self.add_clause([-x1, -x2, x3]);
    }

    /// `x1 => (x2 <=> x3)`
    fn imply_iff(&mut self, x1: Lit, x2: Lit, x3: Lit) {
        self.imply_imply(x1, x2, x3);
        self.imply_imply(x1, x3, x2);
    }

    /// `lhs <=> AND(xs)`
    fn iff_and<I>(&mut self, lhs: Lit, xs: I)
    where
        I: IntoIterator<Item = Lit>,
    {
        let mut long = vec![lhs];
        for x in xs {
            self.imply(lhs, x);
            long.push(-x);
        }
        self.add_clause(long);
    }

    /// `lhs <=> OR(xs)`
    fn iff_or<I>(&mut self, lhs: Lit, xs: I)
    where
        I: IntoIterator<Item = Lit>,
    {
        self.iff_and(-lhs, xs.into_iter().map(|x| -x));
    }

    /// `lhs <=> (x1 <=> x2)`
    fn iff_iff(&mut self, lhs: Lit, x1: Lit, x2: Lit) {
        self.imply_iff(lhs, x1, x2);
        self.add_clause([lhs, -x1, -x2]);
        self.add_clause([lhs, x1, x2]);
    }

    /// Fresh literal fixed to true.
    fn new_true(&mut self) -> Lit {
        let y = self.new_var();
        self.add_unit(y);
        y
    }
}
