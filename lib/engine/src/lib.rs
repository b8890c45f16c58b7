pub mod bimodal;
pub mod deadline;
pub mod driver;
pub mod error;
pub mod example;
pub mod gates;
pub mod hyper;
pub mod iterate;
pub mod model;
pub mod proposition;
pub mod runner;
pub mod settings;
pub mod state;
pub mod symmetry;
pub mod syntax;
pub mod theory;

pub use driver::{Problem, Report, Verdict};
pub use error::{CheckError, Result};
pub use model::Countermodel;
pub use settings::Settings;
pub use theory::{Theory, TheoryRegistry, Translation};
