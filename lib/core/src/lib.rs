pub mod domainvar;
pub mod lit;
pub mod op;
pub mod solver;
