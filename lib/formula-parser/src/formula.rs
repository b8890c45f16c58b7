use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ParseError;
use crate::parser::parse_formula;

/// Sentence letter: a single uppercase ASCII letter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom(char);

impl Atom {
    pub fn new(name: char) -> Option<Self> {
        name.is_ascii_uppercase().then_some(Atom(name))
    }

    pub const fn name(self) -> char {
        self.0
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnaryOp {
    Neg,
    Box,
    Diamond,
    /// `\Future`: at every later time.
    Future,
    /// `\future`: at some later time.
    SomeFuture,
    /// `\Past`: at every earlier time.
    Past,
    /// `\past`: at some earlier time.
    SomePast,
    Always,
    Sometime,
    CfBox,
    CfDiamond,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 11] = [
        UnaryOp::Neg,
        UnaryOp::Box,
        UnaryOp::Diamond,
        UnaryOp::Future,
        UnaryOp::SomeFuture,
        UnaryOp::Past,
        UnaryOp::SomePast,
        UnaryOp::Always,
        UnaryOp::Sometime,
        UnaryOp::CfBox,
        UnaryOp::CfDiamond,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "\\neg",
            UnaryOp::Box => "\\Box",
            UnaryOp::Diamond => "\\Diamond",
            UnaryOp::Future => "\\Future",
            UnaryOp::SomeFuture => "\\future",
            UnaryOp::Past => "\\Past",
            UnaryOp::SomePast => "\\past",
            UnaryOp::Always => "\\Always",
            UnaryOp::Sometime => "\\Sometime",
            UnaryOp::CfBox => "\\CFBox",
            UnaryOp::CfDiamond => "\\CFDiamond",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Iff,
    /// Would-counterfactual `\boxright`.
    BoxRight,
    /// Might-counterfactual `\diamondright`.
    DiamondRight,
    /// Ground `\leq`.
    Ground,
    /// Essence `\sqsubseteq`.
    Essence,
    /// Propositional identity `\equiv`.
    Identity,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 9] = [
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Implies,
        BinaryOp::Iff,
        BinaryOp::BoxRight,
        BinaryOp::DiamondRight,
        BinaryOp::Ground,
        BinaryOp::Essence,
        BinaryOp::Identity,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "\\wedge",
            BinaryOp::Or => "\\vee",
            BinaryOp::Implies => "\\rightarrow",
            BinaryOp::Iff => "\\leftrightarrow",
            BinaryOp::BoxRight => "\\boxright",
            BinaryOp::DiamondRight => "\\diamondright",
            BinaryOp::Ground => "\\leq",
            BinaryOp::Essence => "\\sqsubseteq",
            BinaryOp::Identity => "\\equiv",
        }
    }
}

/// Any operator symbol of the language, including the two constants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Top,
    Bot,
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl Operator {
    pub fn all() -> impl Iterator<Item = Operator> {
        [Operator::Top, Operator::Bot]
            .into_iter()
            .chain(UnaryOp::ALL.into_iter().map(Operator::Unary))
            .chain(BinaryOp::ALL.into_iter().map(Operator::Binary))
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Top => "\\top",
            Operator::Bot => "\\bot",
            Operator::Unary(op) => op.symbol(),
            Operator::Binary(op) => op.symbol(),
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::all().find(|op| op.symbol() == symbol)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Immutable formula tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formula {
    Atom(Atom),
    Top,
    Bot,
    Unary(UnaryOp, Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
}

// Constructors
impl Formula {
    /// Atom named by `name`. Panics unless `name` is an uppercase ASCII letter.
    pub fn atom(name: char) -> Self {
        match Atom::new(name) {
            Some(atom) => Formula::Atom(atom),
            None => panic!("invalid atom name {:?}", name),
        }
    }

    pub fn unary(op: UnaryOp, arg: Formula) -> Self {
        Formula::Unary(op, Box::new(arg))
    }

    pub fn binary(op: BinaryOp, lhs: Formula, rhs: Formula) -> Self {
        Formula::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(arg: Formula) -> Self {
        Self::unary(UnaryOp::Neg, arg)
    }

    pub fn and(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::And, lhs, rhs)
    }

    pub fn or(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Or, lhs, rhs)
    }

    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Implies, lhs, rhs)
    }

    pub fn necessarily(arg: Formula) -> Self {
        Self::unary(UnaryOp::Box, arg)
    }

    pub fn possibly(arg: Formula) -> Self {
        Self::unary(UnaryOp::Diamond, arg)
    }

    pub fn would(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(BinaryOp::BoxRight, lhs, rhs)
    }
}

impl Formula {
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Formula::Atom(_) => None,
            Formula::Top => Some(Operator::Top),
            Formula::Bot => Some(Operator::Bot),
            Formula::Unary(op, _) => Some(Operator::Unary(*op)),
            Formula::Binary(op, _, _) => Some(Operator::Binary(*op)),
        }
    }

    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::Atom(_) | Formula::Top | Formula::Bot => vec![],
            Formula::Unary(_, arg) => vec![arg.as_ref()],
            Formula::Binary(_, lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
        }
    }

    /// All subformulas in pre-order, starting with `self`.
    pub fn subformulas(&self) -> Vec<&Formula> {
        let mut result = vec![self];
        let mut i = 0;
        while i < result.len() {
            let current: &Formula = result[i];
            let children = current.children();
            result.splice(i + 1..i + 1, children);
            i += 1;
        }
        result
    }

    pub fn atoms(&self) -> BTreeSet<Atom> {
        self.subformulas()
            .into_iter()
            .filter_map(|f| match f {
                Formula::Atom(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn operators(&self) -> BTreeSet<Operator> {
        self.subformulas().into_iter().filter_map(Formula::operator).collect()
    }

    /// Number of operator occurrences.
    pub fn complexity(&self) -> usize {
        self.subformulas().into_iter().filter(|f| f.operator().is_some()).count()
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Atom(atom) => write!(f, "{}", atom),
            Formula::Top => write!(f, "\\top"),
            Formula::Bot => write!(f, "\\bot"),
            Formula::Unary(op, arg) => write!(f, "{} {}", op.symbol(), arg),
            Formula::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_formula(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parenthesizes_binaries() {
        let a = Formula::atom('A');
        let b = Formula::atom('B');
        let f = Formula::necessarily(Formula::implies(a.clone(), Formula::not(b)));
        assert_eq!(f.to_string(), "\\Box (A \\rightarrow \\neg B)");
        assert_eq!(Formula::would(a, Formula::Top).to_string(), "(A \\boxright \\top)");
    }

    #[test]
    fn test_atoms_and_operators() {
        let f = Formula::and(
            Formula::atom('B'),
            Formula::possibly(Formula::or(Formula::atom('A'), Formula::atom('B'))),
        );
        assert_eq!(f.atoms().into_iter().map(Atom::name).collect::<String>(), "AB");
        let ops = f.operators();
        assert!(ops.contains(&Operator::Binary(BinaryOp::And)));
        assert!(ops.contains(&Operator::Unary(UnaryOp::Diamond)));
        assert_eq!(ops.len(), 3);
        assert_eq!(f.complexity(), 3);
    }

    #[test]
    fn test_subformulas_preorder() {
        let f = Formula::and(Formula::not(Formula::atom('A')), Formula::atom('B'));
        let subs = f.subformulas().into_iter().map(|g| g.to_string()).collect::<Vec<_>>();
        assert_eq!(subs, vec!["(\\neg A \\wedge B)", "\\neg A", "A", "B"]);
    }

    #[test]
    fn test_operator_symbols_round_trip() {
        for op in Operator::all() {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol("\\nope"), None);
    }
}
