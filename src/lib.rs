pub use formula_parser as formula;
pub use modal_nexus_core as core;
pub use modal_nexus_engine as engine;
pub use modal_nexus_wrappers as wrappers;
