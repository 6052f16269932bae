//! People, units and positions.

use super::{PersonId, PositionId, UnitId};
use serde::{Deserialize, Serialize};

/// A contracted person. Exists only while at least one contract references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: PersonId,
    pub name: String,
}

/// Organizational unit owning positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_id: UnitId,
    /// Unique across all units.
    pub name: String,
}

/// Position belonging to exactly one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub position_id: PositionId,
    /// Unique across all positions.
    pub code: String,
    pub description: String,
    pub unit_id: UnitId,
}

/// Position row joined with its unit name for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionListing {
    pub position: Position,
    pub unit_name: String,
}
