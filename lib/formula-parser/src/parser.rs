use log::debug;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;

use crate::error::*;
use crate::formula::{Atom, BinaryOp, Formula, UnaryOp};
use crate::lexer::scan;

#[derive(Parser)]
#[grammar = "grammar/formula.pest"] // relative to project `src`
struct FormulaParser;

/// Parse a formula written in the LaTeX-like surface syntax.
pub fn parse_formula(input: &str) -> Result<Formula> {
    scan(input)?;

    let mut pairs = FormulaParser::parse(Rule::main, input).map_err(|e| {
        let position = match e.location {
            InputLocation::Pos(pos) => pos,
            InputLocation::Span((start, _)) => start,
        };
        ParseError::Syntax {
            message: e.variant.message().into_owned(),
            position,
        }
    })?;
    let main = next(&mut pairs, input)?;
    let formula = next(&mut main.into_inner(), input)?;
    parse_pair(formula)
}

fn next<'i>(pairs: &mut Pairs<'i, Rule>, input: &str) -> Result<Pair<'i, Rule>> {
    match pairs.next() {
        Some(pair) => Ok(pair),
        None => SyntaxSnafu {
            message: format!("incomplete formula `{}`", input),
            position: input.len(),
        }
        .fail(),
    }
}

fn parse_pair(pair: Pair<Rule>) -> Result<Formula> {
    debug!("{:?} = {:?}", pair.as_rule(), pair.as_str());
    let position = pair.as_span().start();
    let source = pair.as_str();
    match pair.as_rule() {
        Rule::atom => match source.chars().next().and_then(Atom::new) {
            Some(atom) => Ok(Formula::Atom(atom)),
            None => UnrecognizedAtomSnafu { atom: source, position }.fail(),
        },
        Rule::top => Ok(Formula::Top),
        Rule::bot => Ok(Formula::Bot),
        Rule::unary => {
            let mut inner = pair.into_inner();
            let op = unary_op(next(&mut inner, source)?.as_rule(), source, position)?;
            let arg = parse_pair(next(&mut inner, source)?)?;
            Ok(Formula::unary(op, arg))
        }
        Rule::binary => {
            let mut inner = pair.into_inner();
            let lhs = parse_pair(next(&mut inner, source)?)?;
            let op = binary_op(next(&mut inner, source)?.as_rule(), source, position)?;
            let rhs = parse_pair(next(&mut inner, source)?)?;
            Ok(Formula::binary(op, lhs, rhs))
        }
        rule => SyntaxSnafu {
            message: format!("unexpected {:?} in `{}`", rule, source),
            position,
        }
        .fail(),
    }
}

fn unary_op(rule: Rule, source: &str, position: usize) -> Result<UnaryOp> {
    Ok(match rule {
        Rule::neg => UnaryOp::Neg,
        Rule::box_op => UnaryOp::Box,
        Rule::diamond_op => UnaryOp::Diamond,
        Rule::future => UnaryOp::Future,
        Rule::some_future => UnaryOp::SomeFuture,
        Rule::past => UnaryOp::Past,
        Rule::some_past => UnaryOp::SomePast,
        Rule::always => UnaryOp::Always,
        Rule::sometime => UnaryOp::Sometime,
        Rule::cf_box => UnaryOp::CfBox,
        Rule::cf_diamond => UnaryOp::CfDiamond,
        _ => {
            return SyntaxSnafu {
                message: format!("expected a unary operator in `{}`", source),
                position,
            }
            .fail()
        }
    })
}

fn binary_op(rule: Rule, source: &str, position: usize) -> Result<BinaryOp> {
    Ok(match rule {
        Rule::and => BinaryOp::And,
        Rule::or => BinaryOp::Or,
        Rule::implies => BinaryOp::Implies,
        Rule::iff => BinaryOp::Iff,
        Rule::boxright => BinaryOp::BoxRight,
        Rule::diamondright => BinaryOp::DiamondRight,
        Rule::ground => BinaryOp::Ground,
        Rule::essence => BinaryOp::Essence,
        Rule::identity => BinaryOp::Identity,
        _ => {
            return SyntaxSnafu {
                message: format!("expected a binary operator in `{}`", source),
                position,
            }
            .fail()
        }
    })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn a() -> Formula {
        Formula::atom('A')
    }
    fn b() -> Formula {
        Formula::atom('B')
    }

    #[test]
    fn test_single_atom() {
        assert_eq!(parse_formula("A"), Ok(a()));
        assert_eq!(parse_formula("  ((A)) "), Ok(a()));
    }

    #[test]
    fn test_constants() {
        assert_eq!(parse_formula("\\top"), Ok(Formula::Top));
        assert_eq!(parse_formula("\\neg \\bot"), Ok(Formula::not(Formula::Bot)));
    }

    #[test]
    fn test_parenthesized_binary() {
        assert_eq!(parse_formula("(A \\vee B)"), Ok(Formula::or(a(), b())));
        assert_eq!(
            parse_formula("\\Box (A \\rightarrow B)"),
            Ok(Formula::necessarily(Formula::implies(a(), b())))
        );
    }

    #[test]
    fn test_top_level_binary_without_parens() {
        assert_eq!(
            parse_formula("\\Box A \\vee \\Box B"),
            Ok(Formula::or(Formula::necessarily(a()), Formula::necessarily(b())))
        );
    }

    #[test]
    fn test_nested_binary_requires_parens() {
        let result = parse_formula("A \\wedge B \\wedge C");
        assert!(matches!(result, Err(ParseError::Syntax { .. })), "{:?}", result);
        let result = parse_formula("\\neg A \\wedge B \\vee C");
        assert!(matches!(result, Err(ParseError::Syntax { .. })), "{:?}", result);
    }

    #[test]
    fn test_all_operators() {
        let cases = [
            ("\\Diamond A", Formula::possibly(a())),
            ("\\Future A", Formula::unary(UnaryOp::Future, a())),
            ("\\future A", Formula::unary(UnaryOp::SomeFuture, a())),
            ("\\Past A", Formula::unary(UnaryOp::Past, a())),
            ("\\past A", Formula::unary(UnaryOp::SomePast, a())),
            ("\\Always A", Formula::unary(UnaryOp::Always, a())),
            ("\\Sometime A", Formula::unary(UnaryOp::Sometime, a())),
            ("\\CFBox A", Formula::unary(UnaryOp::CfBox, a())),
            ("\\CFDiamond A", Formula::unary(UnaryOp::CfDiamond, a())),
            ("(A \\leftrightarrow B)", Formula::binary(BinaryOp::Iff, a(), b())),
            ("(A \\boxright B)", Formula::would(a(), b())),
            ("(A \\diamondright B)", Formula::binary(BinaryOp::DiamondRight, a(), b())),
            ("(A \\leq B)", Formula::binary(BinaryOp::Ground, a(), b())),
            ("(A \\sqsubseteq B)", Formula::binary(BinaryOp::Essence, a(), b())),
            ("(A \\equiv B)", Formula::binary(BinaryOp::Identity, a(), b())),
        ];
        for (source, expected) in cases {
            assert_eq!(parse_formula(source), Ok(expected), "{}", source);
        }
    }

    #[test]
    fn test_display_parses_back() {
        let source = "\\neg ((A \\wedge \\Diamond B) \\boxright \\Future (\\top \\equiv \\neg C))";
        let formula = parse_formula(source).unwrap();
        assert_eq!(formula.to_string(), source);
        assert_eq!(parse_formula(&formula.to_string()), Ok(formula));
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(parse_formula("\\Nec A"), Err(ParseError::UnknownOperator { .. })));
        assert!(matches!(parse_formula("(A \\vee B"), Err(ParseError::UnbalancedParentheses { .. })));
        assert!(matches!(parse_formula("(a \\vee B)"), Err(ParseError::UnrecognizedAtom { .. })));
        assert!(matches!(parse_formula(""), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse_formula("A B"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse_formula("\\wedge A"), Err(ParseError::Syntax { .. })));
    }
}
