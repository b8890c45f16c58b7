use tracing::debug;

use crate::assignment::LBool;
use crate::idx::{VarHeap, VarVec};
use crate::lit::Var;

/// VSIDS branching order.
#[derive(Debug)]
pub struct VarOrder {
    pub(crate) activity: VarVec<f64>,
    order_heap: VarHeap,
    var_decay: f64,
    var_inc: f64,
}

impl VarOrder {
    pub fn new(var_decay: f64) -> Self {
        Self {
            activity: VarVec::new(),
            order_heap: VarHeap::new(),
            var_decay,
            var_inc: 1.0,
        }
    }

    pub fn init(&mut self, var: Var) {
        self.activity.init_by(&var, || 0.0);
        self.insert_var_order(var);
    }
}

impl VarOrder {
    pub fn var_decay_activity(&mut self) {
        self.var_inc /= self.var_decay;
    }

    pub fn var_bump_activity(&mut self, var: Var) {
        let new = self.activity[var] + self.var_inc;
        self.activity[var] = new;

        // Rescale large activities, if necessary:
        if new > 1e100 {
            self.var_rescale_activity();
        }

        if self.order_heap.contains(&var) {
            let act = &self.activity;
            self.order_heap.update_by(var, |a, b| act[a] > act[b]);
        }
    }

    fn var_rescale_activity(&mut self) {
        debug!("Rescaling activity");
        for a in self.activity.iter_mut() {
            *a *= 1e-100;
        }
        self.var_inc *= 1e-100;
    }

    pub fn insert_var_order(&mut self, var: Var) {
        let act = &self.activity;
        self.order_heap.insert_by(var, |a, b| act[a] > act[b]);
    }

    /// Pop variables until an unassigned one is found.
    pub fn pick_branching_variable(&mut self, assignment: &VarVec<LBool>) -> Option<Var> {
        loop {
            let act = &self.activity;
            let var = self.order_heap.pop_by(|a, b| act[a] > act[b])?;
            if assignment[var].is_undef() {
                return Some(var);
            }
        }
    }
}
