//! Shared domain types, errors, and validation rules for the bestiary
//! catalog. Everything here is pure; the db and api crates build on it.

pub mod error;
pub mod types;
pub mod validation;
