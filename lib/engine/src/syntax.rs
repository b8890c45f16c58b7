//! Derived operators, expanded into primitives before encoding.

use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use formula_parser::{BinaryOp, Formula, Operator, UnaryOp};

use crate::error::*;

/// Body of a definition, with holes for the operator's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Arg(usize),
    Top,
    Bot,
    Unary(UnaryOp, Box<Template>),
    Binary(BinaryOp, Box<Template>, Box<Template>),
}

impl Template {
    pub fn unary(op: UnaryOp, arg: Template) -> Self {
        Template::Unary(op, Box::new(arg))
    }

    pub fn binary(op: BinaryOp, lhs: Template, rhs: Template) -> Self {
        Template::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    fn operators(&self, out: &mut BTreeSet<Operator>) {
        match self {
            Template::Arg(_) => {}
            Template::Top => {
                out.insert(Operator::Top);
            }
            Template::Bot => {
                out.insert(Operator::Bot);
            }
            Template::Unary(op, arg) => {
                out.insert(Operator::Unary(*op));
                arg.operators(out);
            }
            Template::Binary(op, lhs, rhs) => {
                out.insert(Operator::Binary(*op));
                lhs.operators(out);
                rhs.operators(out);
            }
        }
    }

    fn instantiate(&self, args: &[Formula]) -> Formula {
        match self {
            Template::Arg(i) => args[*i].clone(),
            Template::Top => Formula::Top,
            Template::Bot => Formula::Bot,
            Template::Unary(op, arg) => Formula::unary(*op, arg.instantiate(args)),
            Template::Binary(op, lhs, rhs) => Formula::binary(*op, lhs.instantiate(args), rhs.instantiate(args)),
        }
    }
}

/// Registry of derived operators.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    definitions: BTreeMap<Operator, Template>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Material conditional and biconditional, the tense abbreviations and the
    /// counterfactual modals.
    pub fn standard() -> Self {
        use Template::Arg;

        let a = || Arg(0);
        let b = || Arg(1);
        let neg = |x| Template::unary(UnaryOp::Neg, x);
        let bin = Template::binary;

        let mut definitions = Definitions::new();
        let standard = [
            (
                Operator::Binary(BinaryOp::Implies),
                bin(BinaryOp::Or, neg(a()), b()),
            ),
            (
                Operator::Binary(BinaryOp::Iff),
                bin(
                    BinaryOp::And,
                    bin(BinaryOp::Implies, a(), b()),
                    bin(BinaryOp::Implies, b(), a()),
                ),
            ),
            (
                Operator::Unary(UnaryOp::Always),
                bin(
                    BinaryOp::And,
                    Template::unary(UnaryOp::Past, a()),
                    bin(BinaryOp::And, a(), Template::unary(UnaryOp::Future, a())),
                ),
            ),
            (
                Operator::Unary(UnaryOp::Sometime),
                bin(
                    BinaryOp::Or,
                    Template::unary(UnaryOp::SomePast, a()),
                    bin(BinaryOp::Or, a(), Template::unary(UnaryOp::SomeFuture, a())),
                ),
            ),
            (
                Operator::Unary(UnaryOp::CfBox),
                bin(BinaryOp::BoxRight, Template::Top, a()),
            ),
            (
                Operator::Unary(UnaryOp::CfDiamond),
                bin(BinaryOp::DiamondRight, Template::Top, a()),
            ),
        ];
        for (op, body) in standard {
            // None of these refer back to themselves.
            if let Err(e) = definitions.define(op, body) {
                unreachable!("{}", e);
            }
        }
        definitions
    }

    /// Register `op` as an abbreviation of `body`.
    ///
    /// Fails if `body` mentions `op`, directly or through other definitions.
    pub fn define(&mut self, op: Operator, body: Template) -> Result<()> {
        let mut mentioned = BTreeSet::new();
        body.operators(&mut mentioned);
        let mut visited = BTreeSet::new();
        let mut stack = mentioned.into_iter().collect::<Vec<_>>();
        while let Some(next) = stack.pop() {
            if next == op {
                return CyclicDefinitionSnafu { operator: op.symbol() }.fail();
            }
            if visited.insert(next) {
                if let Some(template) = self.definitions.get(&next) {
                    let mut nested = BTreeSet::new();
                    template.operators(&mut nested);
                    stack.extend(nested);
                }
            }
        }
        self.definitions.insert(op, body);
        Ok(())
    }

    pub fn is_defined(&self, op: Operator) -> bool {
        self.definitions.contains_key(&op)
    }

    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.definitions.keys().copied()
    }

    /// Rewrite every derived operator in `formula` into its definition.
    pub fn expand(&self, formula: &Formula) -> Formula {
        let expanded = match formula {
            Formula::Atom(_) | Formula::Top | Formula::Bot => return formula.clone(),
            Formula::Unary(op, arg) => Formula::unary(*op, self.expand(arg)),
            Formula::Binary(op, lhs, rhs) => Formula::binary(*op, self.expand(lhs), self.expand(rhs)),
        };
        let op = match expanded.operator() {
            Some(op) => op,
            None => return expanded,
        };
        match self.definitions.get(&op) {
            Some(template) => {
                let args = expanded.children().into_iter().cloned().collect::<Vec<_>>();
                let result = self.expand(&template.instantiate(&args));
                trace!("Expanded {} into {}", expanded, result);
                result
            }
            None => expanded,
        }
    }
}
