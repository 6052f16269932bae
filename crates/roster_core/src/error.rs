//! Error taxonomy for roster core operations.
//!
//! # Responsibility
//! - Classify failures into business-rule, uniqueness, not-found and store
//!   errors so callers can pick a user-facing reaction.
//!
//! # Invariants
//! - Unique-constraint violations on `units.name` / `positions.code` are
//!   reported as `Uniqueness`, never as raw store errors.
//! - Every variant is returned after the enclosing unit of work rolled back.

use crate::db::DbError;
use crate::model::contract::TermsViolation;
use crate::model::{ContractId, PersonId, PositionId, UnitId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RosterResult<T> = Result<T, RosterError>;

/// Reference to a row that was expected to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Person(PersonId),
    Unit(UnitId),
    Position(PositionId),
    Contract(ContractId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person(id) => write!(f, "person {id}"),
            Self::Unit(id) => write!(f, "unit {id}"),
            Self::Position(id) => write!(f, "position {id}"),
            Self::Contract(id) => write!(f, "contract {id}"),
        }
    }
}

/// Field guarded by a unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    UnitName,
    PositionCode,
}

impl Display for UniqueField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnitName => write!(f, "unit name"),
            Self::PositionCode => write!(f, "position code"),
        }
    }
}

/// Cross-entity rule rejected by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessRuleViolation {
    /// Position is stored under a different unit than the one claimed.
    PositionNotInUnit {
        position_id: PositionId,
        unit_id: UnitId,
    },
    /// Contract dates or year count are inconsistent.
    Terms(TermsViolation),
    /// Required text field is blank after trimming.
    BlankField(&'static str),
}

impl Display for BusinessRuleViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PositionNotInUnit {
                position_id,
                unit_id,
            } => write!(
                f,
                "position {position_id} does not belong to unit {unit_id}"
            ),
            Self::Terms(err) => write!(f, "{err}"),
            Self::BlankField(field) => write!(f, "{field} is required"),
        }
    }
}

/// Error returned by every roster core operation.
#[derive(Debug)]
pub enum RosterError {
    BusinessRule(BusinessRuleViolation),
    Uniqueness(UniqueField),
    NotFound(EntityRef),
    Db(DbError),
}

impl RosterError {
    /// Whether re-prompting the user with corrected input can succeed.
    pub fn is_user_recoverable(&self) -> bool {
        !matches!(self, Self::Db(_))
    }
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BusinessRule(rule) => write!(f, "{rule}"),
            Self::Uniqueness(field) => write!(f, "{field} must be unique"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::BusinessRule(BusinessRuleViolation::Terms(err)) => Some(err),
            Self::BusinessRule(_) => None,
            Self::Uniqueness(_) => None,
            Self::NotFound(_) => None,
        }
    }
}

impl From<BusinessRuleViolation> for RosterError {
    fn from(value: BusinessRuleViolation) -> Self {
        Self::BusinessRule(value)
    }
}

impl From<TermsViolation> for RosterError {
    fn from(value: TermsViolation) -> Self {
        Self::BusinessRule(BusinessRuleViolation::Terms(value))
    }
}

impl From<DbError> for RosterError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RosterError {
    fn from(value: rusqlite::Error) -> Self {
        match unique_violation(&value) {
            Some(field) => Self::Uniqueness(field),
            None => Self::Db(DbError::Sqlite(value)),
        }
    }
}

fn unique_violation(err: &rusqlite::Error) -> Option<UniqueField> {
    let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
        return None;
    };
    if failure.extended_code != rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
        return None;
    }

    if message.contains("units.name") {
        Some(UniqueField::UnitName)
    } else if message.contains("positions.code") {
        Some(UniqueField::PositionCode)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{RosterError, UniqueField};
    use rusqlite::Connection;

    fn unique_failure(table_sql: &str, insert_sql: &str) -> rusqlite::Error {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(table_sql).unwrap();
        conn.execute(insert_sql, []).unwrap();
        conn.execute(insert_sql, []).unwrap_err()
    }

    #[test]
    fn unit_name_violation_maps_to_uniqueness() {
        let err = unique_failure(
            "CREATE TABLE units (unit_id INTEGER PRIMARY KEY, name TEXT UNIQUE);",
            "INSERT INTO units (name) VALUES ('Offense');",
        );
        assert!(matches!(
            RosterError::from(err),
            RosterError::Uniqueness(UniqueField::UnitName)
        ));
    }

    #[test]
    fn position_code_violation_maps_to_uniqueness() {
        let err = unique_failure(
            "CREATE TABLE positions (position_id INTEGER PRIMARY KEY, code TEXT UNIQUE);",
            "INSERT INTO positions (code) VALUES ('QB');",
        );
        assert!(matches!(
            RosterError::from(err),
            RosterError::Uniqueness(UniqueField::PositionCode)
        ));
    }

    #[test]
    fn unrelated_store_errors_stay_store_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn.execute("INSERT INTO missing VALUES (1);", []).unwrap_err();
        let mapped = RosterError::from(err);
        assert!(matches!(mapped, RosterError::Db(_)));
        assert!(!mapped.is_user_recoverable());
    }
}
