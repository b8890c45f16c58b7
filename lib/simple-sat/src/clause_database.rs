use tracing::debug;

use crate::assignment::{Assignment, LBool};
use crate::clause_allocator::ClauseAllocator;
use crate::cref::ClauseRef;
use crate::lit::Lit;
use crate::utils::cmp_f64;

#[derive(Debug)]
pub struct ClauseDatabase {
    /// Original clauses.
    clauses: Vec<ClauseRef>,
    /// Learnt clauses.
    learnts: Vec<ClauseRef>,
    // Clause activity:
    cla_decay: f64,
    cla_inc: f64,
}

impl ClauseDatabase {
    pub fn new(cla_decay: f64) -> Self {
        Self {
            clauses: Vec::new(),
            learnts: Vec::new(),
            cla_decay,
            cla_inc: 1.0,
        }
    }
}

impl ClauseDatabase {
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
    pub fn num_learnts(&self) -> usize {
        self.learnts.len()
    }

    pub fn new_clause(&mut self, lits: Vec<Lit>, learnt: bool, ca: &mut ClauseAllocator) -> ClauseRef {
        let cref = ca.alloc(lits, learnt);
        if learnt {
            self.learnts.push(cref);
        } else {
            self.clauses.push(cref);
        }
        cref
    }

    pub fn cla_decay_activity(&mut self) {
        self.cla_inc /= self.cla_decay;
    }

    pub fn cla_bump_activity(&mut self, cref: ClauseRef, ca: &mut ClauseAllocator) {
        let clause = ca.clause_mut(cref);
        if !clause.is_learnt() {
            return;
        }

        clause.activity += self.cla_inc;

        if clause.activity > 1e20 {
            // Rescale:
            self.cla_inc *= 1e-20;
            for &cref in self.learnts.iter() {
                ca.clause_mut(cref).activity *= 1e-20;
            }
        }
    }

    /// Delete clauses satisfied at the root level. Must be called at decision level zero.
    pub fn simplify(&mut self, assignment: &Assignment, ca: &mut ClauseAllocator) {
        debug_assert_eq!(assignment.decision_level(), 0);
        let before = self.clauses.len() + self.learnts.len();
        for list in [&mut self.clauses, &mut self.learnts] {
            list.retain(|&cref| {
                let clause = ca.clause_mut(cref);
                let satisfied = clause.lits().iter().any(|&lit| assignment.value(lit) == LBool::True);
                if satisfied && !is_locked(cref, clause.lits(), assignment) {
                    clause.mark_deleted();
                    false
                } else {
                    true
                }
            });
        }
        let after = self.clauses.len() + self.learnts.len();
        debug!("simplify: removed {} satisfied clauses", before - after);
    }

    /// Remove the less active half of the learnt clauses, keeping binary and locked ones.
    pub fn reduce(&mut self, assignment: &Assignment, ca: &mut ClauseAllocator) {
        let extra_lim = self.cla_inc / self.learnts.len().max(1) as f64;

        self.learnts.sort_by(|&a, &b| {
            let (a, b) = (ca.clause(a), ca.clause(b));
            // binary clauses first, then by increasing activity
            (a.len() > 2)
                .cmp(&(b.len() > 2))
                .reverse()
                .then_with(|| cmp_f64(a.activity, b.activity))
        });

        let half = self.learnts.len() / 2;
        let before = self.learnts.len();
        let mut index = 0;
        self.learnts.retain(|&cref| {
            let clause = ca.clause_mut(cref);
            let keep = clause.len() <= 2
                || is_locked(cref, clause.lits(), assignment)
                || (index >= half && clause.activity >= extra_lim);
            index += 1;
            if !keep {
                clause.mark_deleted();
            }
            keep
        });
        debug!("reduce: {} -> {} learnts", before, self.learnts.len());
    }
}

/// A clause is locked while it is the reason for its first literal.
fn is_locked(cref: ClauseRef, lits: &[Lit], assignment: &Assignment) -> bool {
    match lits.first() {
        Some(&first) => assignment.value(first) == LBool::True && assignment.reason(first.var()) == Some(cref),
        None => false,
    }
}
