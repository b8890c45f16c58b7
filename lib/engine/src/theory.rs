//! Theory descriptors and the registry they are selected from.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;

use formula_parser::{BinaryOp, Formula, Operator, UnaryOp};

use crate::bimodal::BimodalEncoder;
use crate::driver::{self, Problem, Report};
use crate::error::*;
use crate::hyper::HyperEncoder;
use crate::syntax::Definitions;

/// Primitive operators of a theory and the definitions of the derived ones.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    pub primitives: BTreeSet<Operator>,
    pub definitions: Definitions,
}

impl OperatorTable {
    pub fn new<I>(primitives: I, definitions: Definitions) -> Self
    where
        I: IntoIterator<Item = Operator>,
    {
        Self {
            primitives: primitives.into_iter().collect(),
            definitions,
        }
    }

    /// Expand derived operators and reject anything that is not primitive.
    pub fn prepare(&self, theory: &str, formula: &Formula) -> Result<Formula> {
        let expanded = self.definitions.expand(formula);
        match expanded.operators().into_iter().find(|op| !self.primitives.contains(op)) {
            Some(op) => UnsupportedOperatorSnafu {
                theory,
                operator: op.symbol(),
            }
            .fail(),
            None => Ok(expanded),
        }
    }
}

pub trait Theory: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn operators(&self) -> &OperatorTable;

    /// Check a problem whose formulas are already over primitive operators.
    fn check_prepared(&self, problem: &Problem, interrupt: Option<Arc<AtomicBool>>) -> Result<Report>;

    fn check(&self, problem: &Problem, interrupt: Option<Arc<AtomicBool>>) -> Result<Report> {
        let prepare = |formulas: &[Formula]| {
            formulas
                .iter()
                .map(|f| self.operators().prepare(self.name(), f))
                .collect::<Result<Vec<_>>>()
        };
        let prepared = Problem {
            premises: prepare(&problem.premises)?,
            conclusions: prepare(&problem.conclusions)?,
            settings: problem.settings.clone(),
        };
        self.check_prepared(&prepared, interrupt)
    }
}

const PROPOSITIONAL: [Operator; 5] = [
    Operator::Top,
    Operator::Bot,
    Operator::Unary(UnaryOp::Neg),
    Operator::Binary(BinaryOp::And),
    Operator::Binary(BinaryOp::Or),
];

/// Hyperintensional theory of counterfactuals, ground and essence.
#[derive(Debug, Clone)]
pub struct Counterfactual {
    table: OperatorTable,
}

impl Counterfactual {
    pub fn new() -> Self {
        let primitives = PROPOSITIONAL.into_iter().chain([
            Operator::Unary(UnaryOp::Box),
            Operator::Unary(UnaryOp::Diamond),
            Operator::Binary(BinaryOp::BoxRight),
            Operator::Binary(BinaryOp::DiamondRight),
            Operator::Binary(BinaryOp::Ground),
            Operator::Binary(BinaryOp::Essence),
            Operator::Binary(BinaryOp::Identity),
        ]);
        Self {
            table: OperatorTable::new(primitives, Definitions::standard()),
        }
    }
}

impl Default for Counterfactual {
    fn default() -> Self {
        Self::new()
    }
}

impl Theory for Counterfactual {
    fn name(&self) -> &'static str {
        "counterfactual"
    }

    fn operators(&self) -> &OperatorTable {
        &self.table
    }

    fn check_prepared(&self, problem: &Problem, interrupt: Option<Arc<AtomicBool>>) -> Result<Report> {
        driver::check::<HyperEncoder>(problem, interrupt)
    }
}

/// Modal-tense theory over world-histories.
#[derive(Debug, Clone)]
pub struct Bimodal {
    table: OperatorTable,
}

impl Bimodal {
    pub fn new() -> Self {
        let primitives = PROPOSITIONAL.into_iter().chain([
            Operator::Unary(UnaryOp::Box),
            Operator::Unary(UnaryOp::Diamond),
            Operator::Unary(UnaryOp::Future),
            Operator::Unary(UnaryOp::SomeFuture),
            Operator::Unary(UnaryOp::Past),
            Operator::Unary(UnaryOp::SomePast),
        ]);
        Self {
            table: OperatorTable::new(primitives, Definitions::standard()),
        }
    }
}

impl Default for Bimodal {
    fn default() -> Self {
        Self::new()
    }
}

impl Theory for Bimodal {
    fn name(&self) -> &'static str {
        "bimodal"
    }

    fn operators(&self) -> &OperatorTable {
        &self.table
    }

    fn check_prepared(&self, problem: &Problem, interrupt: Option<Arc<AtomicBool>>) -> Result<Report> {
        driver::check::<BimodalEncoder>(problem, interrupt)
    }
}

/// Named theories.
#[derive(Debug, Clone, Default)]
pub struct TheoryRegistry {
    theories: BTreeMap<String, Arc<dyn Theory>>,
}

impl TheoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `counterfactual` (also `Brast-McKie`) and `bimodal`.
    pub fn standard() -> Self {
        let counterfactual: Arc<dyn Theory> = Arc::new(Counterfactual::new());
        let mut registry = Self::new();
        registry.register("counterfactual", Arc::clone(&counterfactual));
        registry.register("Brast-McKie", counterfactual);
        registry.register("bimodal", Arc::new(Bimodal::new()));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, theory: Arc<dyn Theory>) {
        let name = name.into();
        debug!("Registering theory {} as `{}`", theory.name(), name);
        self.theories.insert(name, theory);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Theory>> {
        match self.theories.get(name) {
            Some(theory) => Ok(Arc::clone(theory)),
            None => UnknownTheorySnafu { name }.fail(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.theories.keys().map(String::as_str)
    }
}

/// Symbol dictionary applied to formula sources before parsing.
///
/// Only whole `\command` tokens are rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    symbols: BTreeMap<String, String>,
}

impl Translation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.symbols.insert(from.into(), to.into());
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn apply(&self, source: &str) -> String {
        let mut result = String::with_capacity(source.len());
        let mut rest = source;
        while let Some(start) = rest.find('\\') {
            result.push_str(&rest[..start]);
            let command = &rest[start..];
            let len = 1 + command[1..]
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(command.len() - 1);
            let token = &command[..len];
            result.push_str(self.symbols.get(token).map_or(token, String::as_str));
            rest = &command[len..];
        }
        result.push_str(rest);
        result
    }
}

impl<K, V> FromIterator<(K, V)> for Translation
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut translation = Translation::new();
        for (from, to) in iter {
            translation.insert(from, to);
        }
        translation
    }
}
