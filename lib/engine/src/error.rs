use snafu::Snafu;

use formula_parser::ParseError;

pub type Result<T, E = CheckError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CheckError {
    #[snafu(display("Could not parse `{}`: {}", formula, source))]
    Parse { formula: String, source: ParseError },

    #[snafu(display("Unknown setting `{}`", key))]
    UnknownSetting { key: String },

    #[snafu(display("Missing required setting `{}`", key))]
    MissingSetting { key: String },

    #[snafu(display("Invalid value for setting `{}`: {}", key, reason))]
    InvalidSetting { key: String, reason: String },

    #[snafu(display("Operator `{}` is not supported by the {} theory", operator, theory))]
    UnsupportedOperator { theory: String, operator: String },

    #[snafu(display("Definition of `{}` refers back to itself", operator))]
    CyclicDefinition { operator: String },

    #[snafu(display("Frame constraints are unsatisfiable: {}", reason))]
    InfeasibleFrame { reason: String },

    #[snafu(display("Solver exceeded max_time of {}s", max_time))]
    Timeout { max_time: f64 },

    #[snafu(display("Requested {} models, but only {} exist at this bound", requested, found))]
    IterationExhausted { requested: usize, found: usize },

    #[snafu(display("Extracted model disagrees with the encoding on `{}` (expected {})", formula, expected))]
    UnsoundModel { formula: String, expected: bool },

    #[snafu(display("Unknown theory `{}`", name))]
    UnknownTheory { name: String },
}

impl CheckError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CheckError::Timeout { .. })
    }
}
