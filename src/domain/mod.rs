//! Domain layer types and invariants.

pub mod entities;
pub mod languages;
pub mod salary;
pub mod types;
