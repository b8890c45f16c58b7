use std::hash::Hash;

use ndarray::{Array, ShapeBuilder};

use crate::domainvar::DomainVar;
use crate::lit::Lit;

use super::Solver;

impl<S> SolverExt for S where S: Solver {}

pub trait SolverExt: Solver {
    /// Fresh variables laid out in an array of the given shape.
    fn new_var_array<Sh>(&mut self, shape: Sh) -> Array<Lit, Sh::Dim>
    where
        Sh: ShapeBuilder,
    {
        Array::from_shape_simple_fn(shape, || self.new_var())
    }

    fn new_var_vec(&mut self, len: usize) -> Vec<Lit> {
        (0..len).map(|_| self.new_var()).collect()
    }

    /// One-hot choice of a single domain value.
    fn new_domain_var<I>(&mut self, domain: I) -> DomainVar<I::Item>
    where
        I: IntoIterator,
        I::Item: Hash + Eq + Copy,
    {
        DomainVar::new_onehot(self, domain)
    }
}
