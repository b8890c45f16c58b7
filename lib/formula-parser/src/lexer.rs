//! Pre-parse scan over the raw source.
//!
//! The grammar alone only reports "expected ..." positions; this pass
//! classifies the common mistakes (unknown `\command`, bad atom names,
//! unbalanced parentheses) before the string reaches the parser.

use log::trace;

use crate::error::*;
use crate::formula::Operator;

pub fn scan(input: &str) -> Result<()> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut open = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];
        match c {
            '\\' => {
                let end = run_end(&chars, i + 1, |c| c.is_ascii_alphabetic());
                let operator = slice(input, &chars, i, end);
                trace!("operator `{}` at {}", operator, position);
                if Operator::from_symbol(operator).is_none() {
                    return UnknownOperatorSnafu { operator, position }.fail();
                }
                i = end;
                continue;
            }
            '(' => open.push(position),
            ')' => {
                if open.pop().is_none() {
                    return UnbalancedParenthesesSnafu { position }.fail();
                }
            }
            c if c.is_whitespace() => {}
            c if c.is_alphanumeric() || c == '_' => {
                let end = run_end(&chars, i, |c| c.is_alphanumeric() || c == '_');
                let atom = slice(input, &chars, i, end);
                let mut letters = atom.chars();
                let valid = matches!((letters.next(), letters.next()), (Some(c), None) if c.is_ascii_uppercase());
                if !valid {
                    return UnrecognizedAtomSnafu { atom, position }.fail();
                }
                i = end;
                continue;
            }
            c => {
                return SyntaxSnafu {
                    message: format!("unexpected character `{}`", c),
                    position,
                }
                .fail();
            }
        }
        i += 1;
    }

    match open.pop() {
        Some(position) => UnbalancedParenthesesSnafu { position }.fail(),
        None => Ok(()),
    }
}

fn run_end<F>(chars: &[(usize, char)], start: usize, pred: F) -> usize
where
    F: Fn(char) -> bool,
{
    let mut end = start;
    while end < chars.len() && pred(chars[end].1) {
        end += 1;
    }
    end
}

fn slice<'a>(input: &'a str, chars: &[(usize, char)], start: usize, end: usize) -> &'a str {
    let from = chars[start].0;
    let to = chars.get(end).map_or(input.len(), |&(pos, _)| pos);
    &input[from..to]
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_valid_input() {
        assert_eq!(scan("\\Box (A \\rightarrow \\neg B)"), Ok(()));
        assert_eq!(scan("\\top"), Ok(()));
    }

    #[test]
    fn test_unknown_operator() {
        assert_eq!(
            scan("(A \\wedgie B)"),
            Err(ParseError::UnknownOperator {
                operator: "\\wedgie".to_string(),
                position: 3
            })
        );
        // glued operator and atom
        assert!(matches!(scan("\\negA"), Err(ParseError::UnknownOperator { .. })));
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(scan("(A \\wedge B"), Err(ParseError::UnbalancedParentheses { position: 0 }));
        assert_eq!(scan("A)"), Err(ParseError::UnbalancedParentheses { position: 1 }));
    }

    #[test]
    fn test_bad_atoms() {
        assert!(matches!(scan("p"), Err(ParseError::UnrecognizedAtom { atom, .. }) if atom == "p"));
        assert!(matches!(scan("(AB \\vee C)"), Err(ParseError::UnrecognizedAtom { atom, .. }) if atom == "AB"));
        assert!(matches!(scan("A1"), Err(ParseError::UnrecognizedAtom { .. })));
    }

    #[test]
    fn test_stray_character() {
        assert!(matches!(scan("A & B"), Err(ParseError::Syntax { position: 2, .. })));
    }
}
