use std::ops::BitXor;

use crate::cref::ClauseRef;
use crate::idx::VarVec;
use crate::lit::{Lit, Var};

/// Three-valued assignment of a variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LBool {
    False,
    True,
    Undef,
}

impl LBool {
    pub const fn is_undef(self) -> bool {
        matches!(self, LBool::Undef)
    }
}

impl From<bool> for LBool {
    fn from(b: bool) -> Self {
        if b {
            LBool::True
        } else {
            LBool::False
        }
    }
}

/// Value of a literal from the value of its variable and its sign.
impl BitXor<bool> for LBool {
    type Output = LBool;

    fn bitxor(self, negated: bool) -> Self::Output {
        match self {
            LBool::Undef => LBool::Undef,
            value => LBool::from((value == LBool::True) != negated),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct VarData {
    pub(crate) reason: Option<ClauseRef>,
    pub(crate) level: usize,
}

#[derive(Debug, Default)]
pub struct Assignment {
    pub(crate) assignment: VarVec<LBool>, // {var: value}
    pub(crate) var_data: VarVec<VarData>, // {var: {reason,level}}
    pub(crate) trail: Vec<Lit>,
    pub(crate) trail_lim: Vec<usize>,
    pub(crate) qhead: usize,
}

impl Assignment {
    pub const fn new() -> Self {
        Self {
            assignment: VarVec::new(),
            var_data: VarVec::new(),
            trail: vec![],
            trail_lim: vec![],
            qhead: 0,
        }
    }

    pub fn init(&mut self, var: Var) {
        self.assignment.init_by(&var, || LBool::Undef);
        self.var_data.init_by(&var, || VarData { reason: None, level: 0 });
    }
}

impl Assignment {
    pub fn value_var(&self, var: Var) -> LBool {
        self.assignment[var]
    }
    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment[lit.var()] ^ lit.negated()
    }

    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        self.var_data[var].reason
    }
    pub fn level(&self, var: Var) -> usize {
        self.var_data[var].level
    }

    pub fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }
    pub fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    pub fn num_assigned(&self) -> usize {
        self.trail.len()
    }

    /// Assign `lit` to true. The literal must be unassigned.
    pub fn unchecked_enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        debug_assert_eq!(self.value(lit), LBool::Undef);

        self.assignment[lit.var()] = LBool::from(!lit.negated());
        self.var_data[lit.var()] = VarData {
            reason,
            level: self.decision_level(),
        };
        self.trail.push(lit);
    }

    pub fn dequeue(&mut self) -> Option<Lit> {
        if self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            Some(p)
        } else {
            None
        }
    }

    /// Undo all assignments above `level`, returning the unassigned literals (most recent first).
    pub fn cancel_until(&mut self, level: usize) -> Vec<Lit> {
        if self.decision_level() <= level {
            return Vec::new();
        }
        let lim = self.trail_lim[level];
        let undone: Vec<Lit> = self.trail.drain(lim..).rev().collect();
        for lit in undone.iter() {
            self.assignment[lit.var()] = LBool::Undef;
        }
        self.qhead = lim;
        self.trail_lim.truncate(level);
        undone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_values() {
        assert_eq!(LBool::True ^ true, LBool::False);
        assert_eq!(LBool::False ^ true, LBool::True);
        assert_eq!(LBool::False ^ false, LBool::False);
        assert!((LBool::Undef ^ true).is_undef());
    }

    #[test]
    fn test_enqueue_and_cancel() {
        let mut assignment = Assignment::new();
        for v in 0..3 {
            assignment.init(Var::new(v));
        }
        let a = Lit::positive(Var::new(0));
        let b = !Lit::positive(Var::new(1));

        assignment.unchecked_enqueue(a, None);
        assignment.new_decision_level();
        assignment.unchecked_enqueue(b, None);
        assert_eq!(assignment.value(b), LBool::True);
        assert_eq!(assignment.level(b.var()), 1);
        assert_eq!(assignment.dequeue(), Some(a));
        assert_eq!(assignment.dequeue(), Some(b));
        assert_eq!(assignment.dequeue(), None);

        let undone = assignment.cancel_until(0);
        assert_eq!(undone, vec![b]);
        assert_eq!(assignment.value(b), LBool::Undef);
        assert_eq!(assignment.value(a), LBool::True);
        assert_eq!(assignment.qhead, 1);
    }
}
