use snafu::Snafu;

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Positions are byte offsets into the formula source.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParseError {
    #[snafu(display("Unknown operator `{}` at {}", operator, position))]
    UnknownOperator { operator: String, position: usize },

    #[snafu(display("Unbalanced parenthesis at {}", position))]
    UnbalancedParentheses { position: usize },

    #[snafu(display("Unrecognized atom `{}` at {} (atoms are single uppercase letters)", atom, position))]
    UnrecognizedAtom { atom: String, position: usize },

    #[snafu(display("Syntax error at {}: {}", position, message))]
    Syntax { message: String, position: usize },
}
