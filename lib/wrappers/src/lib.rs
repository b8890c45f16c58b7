#[path = "wrap_simple-sat.rs"]
pub mod simplesat;
