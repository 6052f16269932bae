//! Filtered contract reporting.
//!
//! # Responsibility
//! - Turn optional filter criteria into a parameterized predicate.
//! - Return matching rows and aggregate statistics over the same predicate.
//!
//! # Invariants
//! - Predicate text comes from a closed set of static fragments; filter
//!   values are only ever bound parameters.
//! - Rows and statistics describe exactly the same row set.

pub mod filter;
pub mod query;
