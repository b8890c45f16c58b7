/// How far conflict analysis shrinks a learnt clause after finding the first UIP.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Minimization {
    None,
    /// Drop a literal when its reason is covered by the rest of the clause.
    Local,
    /// Drop a literal when it is implied by the rest of the clause through any chain of reasons.
    Recursive,
}

/// Search parameters. The defaults suit the frame encodings of the model checker:
/// many small definitional clauses and long runs of blocking clauses.
#[derive(Debug, Clone)]
pub struct Options {
    /// Luby sequence when set, geometric otherwise.
    pub is_luby: bool,
    /// Conflicts before the first restart.
    pub restart_init: usize,
    pub restart_inc: f64,

    /// Learnt clauses kept, as a fraction of the original clauses.
    pub learntsize_factor: f64,
    pub learntsize_inc: f64,
    pub learntsize_adjust_start: f64,
    pub learntsize_adjust_inc: f64,

    pub var_decay: f64,
    pub clause_decay: f64,

    /// Value tried first for a variable that was never assigned.
    /// Frame variables mostly default to "absent", so `false` finds sparse models quickly.
    pub initial_phase: bool,
    pub minimization: Minimization,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            is_luby: true,
            restart_init: 100,
            restart_inc: 2.0,
            learntsize_factor: 1.0 / 3.0,
            learntsize_inc: 1.1,
            learntsize_adjust_start: 100.0,
            learntsize_adjust_inc: 1.5,
            var_decay: 0.95,
            clause_decay: 0.999,
            initial_phase: false,
            minimization: Minimization::Recursive,
        }
    }
}
