//! Type system module - semantic types and the suffix convention

pub mod suffix;
pub mod type_system;

pub use type_system::{arithmetic_result, castable, compatible, SemType};
