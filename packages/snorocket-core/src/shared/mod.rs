//! Shared module - constants used across features

pub mod constants;
