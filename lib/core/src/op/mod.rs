pub mod allsat;
pub mod encodings;
pub mod ops;
