//! Repository layer: statements, identity allocation and integrity rules.
//!
//! # Responsibility
//! - Isolate SQLite statement details from service orchestration.
//! - Express cascades as explicit functions over a unit-of-work transaction.
//!
//! # Invariants
//! - Nothing in this layer begins or commits a transaction.
//! - Repository APIs return semantic errors (`NotFound`, business rules) in
//!   addition to store errors.

pub mod identity;
pub mod integrity;
pub mod roster_repo;
