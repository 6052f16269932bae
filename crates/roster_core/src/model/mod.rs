//! Roster domain model.
//!
//! # Responsibility
//! - Define the records shared by repository, service and report layers.
//! - Own the pure contract-term rules (date order and year count).
//!
//! # Invariants
//! - Identifiers are store-assigned integers; person ids are positive and
//!   compacted, all others are surrogate autoincrement keys.
//! - A contract's `unit_id` always equals its position's `unit_id` once
//!   committed.

pub mod contract;
pub mod org;

/// Person identifier. Always the lowest free positive integer at creation.
pub type PersonId = i64;
/// Unit identifier (surrogate).
pub type UnitId = i64;
/// Position identifier (surrogate).
pub type PositionId = i64;
/// Contract identifier (surrogate).
pub type ContractId = i64;
