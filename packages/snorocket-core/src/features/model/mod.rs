//! Model - concepts, roles, literals and axioms
//!
//! Hexagonal Architecture:
//! - domain: immutable value types with structural equality and a total order
//! - application: [`Factory`], the single construction surface

pub mod application;
pub mod domain;

pub use application::Factory;
pub use domain::*;
