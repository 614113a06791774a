pub mod aggregate;
pub mod catalog;
pub mod eval;
pub mod heuristics;
pub mod standard;
