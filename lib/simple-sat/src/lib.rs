pub mod solver;

pub mod assignment;
pub mod budget;
pub mod clause;
pub mod clause_allocator;
pub mod clause_database;
pub mod cref;
pub mod idx;
pub mod learning;
pub mod lit;
pub mod options;
pub mod restart;
pub mod utils;
pub mod var_order;
pub mod watch;
