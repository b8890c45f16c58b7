use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveResponse {
    Sat,
    Unsat,
    /// The search was cut short by its [`SearchLimits`](super::SearchLimits).
    Unknown,
}

impl Display for SolveResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveResponse::Sat => write!(f, "SAT"),
            SolveResponse::Unsat => write!(f, "UNSAT"),
            SolveResponse::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Value of a literal in the last model.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LitValue {
    True,
    False,
    /// No model, or the literal is not part of it.
    Undefined,
}

impl LitValue {
    pub fn is_true(self) -> bool {
        self == LitValue::True
    }

    /// Panics on `Undefined`.
    pub fn bool(self) -> bool {
        match self {
            LitValue::True => true,
            LitValue::False => false,
            LitValue::Undefined => panic!("literal has no value in the last model"),
        }
    }
}

/// Search effort accumulated over all `solve` calls of one solver.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SolveStats {
    pub conflicts: u64,
    pub decisions: u64,
    pub propagations: u64,
}

impl Display for SolveStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} conflicts, {} decisions, {} propagations",
            self.conflicts, self.decisions, self.propagations
        )
    }
}
