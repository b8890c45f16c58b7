use std::fmt::{Display, Formatter};

use formula_parser::Formula;

use crate::bimodal::BimodalModel;
use crate::error::*;
use crate::hyper::HyperModel;

/// Model extracted from a satisfying assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Countermodel {
    Hyperintensional(HyperModel),
    Bimodal(BimodalModel),
}

impl Countermodel {
    /// Truth at the evaluation point, computed directly on the model.
    pub fn is_true(&self, formula: &Formula) -> Result<bool> {
        match self {
            Countermodel::Hyperintensional(model) => model.is_true(formula, model.eval_world),
            Countermodel::Bimodal(model) => model.is_true(formula, 0, model.now()),
        }
    }

    /// Equal up to the choices the frame leaves open: the evaluation world of a
    /// hyperintensional model and the order of the non-main histories of a bimodal one.
    pub fn same_structure(&self, other: &Countermodel) -> bool {
        match (self, other) {
            (Countermodel::Hyperintensional(x), Countermodel::Hyperintensional(y)) => x.structure() == y.structure(),
            (Countermodel::Bimodal(x), Countermodel::Bimodal(y)) => x.structure() == y.structure(),
            _ => false,
        }
    }

    /// Check that every premise holds and, if there are conclusions, that one of them fails.
    pub fn verify(&self, premises: &[Formula], conclusions: &[Formula]) -> Result<()> {
        for premise in premises {
            if !self.is_true(premise)? {
                return UnsoundModelSnafu {
                    formula: premise.to_string(),
                    expected: true,
                }
                .fail();
            }
        }
        if conclusions.is_empty() {
            return Ok(());
        }
        for conclusion in conclusions {
            if !self.is_true(conclusion)? {
                return Ok(());
            }
        }
        let formula = conclusions.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ");
        UnsoundModelSnafu {
            formula,
            expected: false,
        }
        .fail()
    }
}

impl Display for Countermodel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Countermodel::Hyperintensional(model) => write!(f, "{}", model),
            Countermodel::Bimodal(model) => write!(f, "{}", model),
        }
    }
}
