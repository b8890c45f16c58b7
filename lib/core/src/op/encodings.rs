use itertools::Itertools;

use crate::lit::Lit;
use crate::op::ops::Ops;
use crate::solver::Solver;

impl<S> Encodings for S where S: Solver {}

/// Domains up to this size use the pairwise at-most-one encoding.
const PAIRWISE_LIMIT: usize = 8;

pub trait Encodings: Solver {
    fn encode_onehot(&mut self, lits: &[Lit]) {
        self.encode_at_least_one(lits);
        self.encode_at_most_one(lits);
    }

    fn encode_at_least_one(&mut self, lits: &[Lit]) {
        self.add_clause(lits);
    }

    fn encode_at_most_one(&mut self, lits: &[Lit]) {
        if lits.len() <= PAIRWISE_LIMIT {
            self.encode_at_most_one_pairwise(lits);
        } else {
            self.encode_at_most_one_sequential(lits);
        }
    }

    fn encode_at_most_one_pairwise(&mut self, lits: &[Lit]) {
        for (&a, &b) in lits.iter().tuple_combinations() {
            self.imply(a, -b);
        }
    }

    /// Sequential counter encoding (Sinz, 2005): `s[i]` means "some of `lits[..=i]` is true".
    fn encode_at_most_one_sequential(&mut self, lits: &[Lit]) {
        let n = lits.len();
        if n <= 1 {
            return;
        }
        let s = (0..n - 1).map(|_| self.new_var()).collect_vec();
        self.imply(lits[0], s[0]);
        for i in 1..n - 1 {
            self.imply(lits[i], s[i]);
            self.imply(s[i - 1], s[i]);
            self.imply(s[i - 1], -lits[i]);
        }
        self.imply(s[n - 2], -lits[n - 1]);
    }
}
