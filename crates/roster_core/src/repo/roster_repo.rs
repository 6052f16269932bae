//! Roster statements and row mapping.
//!
//! # Responsibility
//! - Keep every roster SQL statement and row decoder in one place.
//! - Provide single-statement primitives that cascades and services compose
//!   inside a unit of work.
//!
//! # Invariants
//! - Statements are literals; all values are bound parameters.
//! - Primitives never open or commit transactions themselves.

use crate::db::executor::{execute, query_all, query_optional};
use crate::error::RosterResult;
use crate::model::contract::{Contract, ContractListing, ContractTerms};
use crate::model::org::{Person, Position, PositionListing, Unit};
use crate::model::{ContractId, PersonId, PositionId, UnitId};
use rusqlite::{params, Connection, Row};

pub(crate) const PERSON_BY_ID_SQL: &str = "SELECT person_id, name
FROM people
WHERE person_id = ?1;";

pub(crate) const UNIT_BY_ID_SQL: &str = "SELECT unit_id, name
FROM units
WHERE unit_id = ?1;";

pub(crate) const UNITS_SQL: &str = "SELECT unit_id, name
FROM units
ORDER BY name ASC, unit_id ASC;";

pub(crate) const POSITION_BY_ID_SQL: &str = "SELECT position_id, code, description, unit_id
FROM positions
WHERE position_id = ?1;";

pub(crate) const POSITION_LISTING_SQL: &str = "SELECT
    p.position_id AS position_id,
    p.code AS code,
    p.description AS description,
    p.unit_id AS unit_id,
    u.name AS unit_name
FROM positions p
JOIN units u ON p.unit_id = u.unit_id
ORDER BY u.name ASC, p.code ASC;";

pub(crate) const CONTRACT_BY_ID_SQL: &str = "SELECT
    contract_id,
    person_id,
    position_id,
    unit_id,
    start_date,
    end_date,
    years,
    salary_millions,
    cap_hit_millions
FROM contracts
WHERE contract_id = ?1;";

/// Column list of the joined contract listing.
pub(crate) const CONTRACT_LISTING_COLUMNS: &str = "SELECT
    c.contract_id AS contract_id,
    c.person_id AS person_id,
    c.position_id AS position_id,
    c.unit_id AS unit_id,
    c.start_date AS start_date,
    c.end_date AS end_date,
    c.years AS years,
    c.salary_millions AS salary_millions,
    c.cap_hit_millions AS cap_hit_millions,
    p.name AS person_name,
    pos.code AS position_code,
    pos.description AS position_description,
    u.name AS unit_name";

/// Row source shared by the contract listing, report rows and report stats.
pub(crate) const CONTRACT_LISTING_FROM: &str = "
FROM contracts c
JOIN people p ON c.person_id = p.person_id
JOIN positions pos ON c.position_id = pos.position_id
JOIN units u ON c.unit_id = u.unit_id";

pub(crate) const CONTRACT_LISTING_ORDER: &str = "
ORDER BY p.person_id ASC, c.contract_id ASC;";

/// Single-statement roster primitives over one connection.
///
/// Constructed on the `Transaction` of a unit of work; reads through it see
/// the unit's own uncommitted writes.
pub struct SqliteRosterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRosterRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn get_person(&self, person_id: PersonId) -> RosterResult<Option<Person>> {
        Ok(query_optional(
            self.conn,
            PERSON_BY_ID_SQL,
            [person_id],
            parse_person_row,
        )?)
    }

    /// All person ids, ascending.
    pub fn list_person_ids(&self) -> RosterResult<Vec<PersonId>> {
        Ok(query_all(
            self.conn,
            "SELECT person_id FROM people ORDER BY person_id ASC;",
            [],
            |row| row.get(0),
        )?)
    }

    pub fn insert_person(&self, person_id: PersonId, name: &str) -> RosterResult<()> {
        execute(
            self.conn,
            "INSERT INTO people (person_id, name) VALUES (?1, ?2);",
            params![person_id, name],
        )?;
        Ok(())
    }

    pub fn count_contracts_for_person(&self, person_id: PersonId) -> RosterResult<i64> {
        let count: Option<i64> = query_optional(
            self.conn,
            "SELECT COUNT(*) FROM contracts WHERE person_id = ?1;",
            [person_id],
            |row| row.get(0),
        )?;
        Ok(count.unwrap_or(0))
    }

    pub fn delete_person(&self, person_id: PersonId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "DELETE FROM people WHERE person_id = ?1;",
            [person_id],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn get_unit(&self, unit_id: UnitId) -> RosterResult<Option<Unit>> {
        Ok(query_optional(
            self.conn,
            UNIT_BY_ID_SQL,
            [unit_id],
            parse_unit_row,
        )?)
    }

    pub fn insert_unit(&self, name: &str) -> RosterResult<Unit> {
        let outcome = execute(self.conn, "INSERT INTO units (name) VALUES (?1);", [name])?;
        Ok(Unit {
            unit_id: outcome.last_insert_id,
            name: name.to_string(),
        })
    }

    pub fn rename_unit(&self, unit_id: UnitId, name: &str) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "UPDATE units SET name = ?2 WHERE unit_id = ?1;",
            params![unit_id, name],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn delete_unit_row(&self, unit_id: UnitId) -> RosterResult<usize> {
        let outcome = execute(self.conn, "DELETE FROM units WHERE unit_id = ?1;", [unit_id])?;
        Ok(outcome.rows_affected)
    }

    pub fn get_position(&self, position_id: PositionId) -> RosterResult<Option<Position>> {
        Ok(query_optional(
            self.conn,
            POSITION_BY_ID_SQL,
            [position_id],
            parse_position_row,
        )?)
    }

    /// Stored unit of a position, `None` when the position does not exist.
    pub fn position_unit(&self, position_id: PositionId) -> RosterResult<Option<UnitId>> {
        Ok(query_optional(
            self.conn,
            "SELECT unit_id FROM positions WHERE position_id = ?1;",
            [position_id],
            |row| row.get(0),
        )?)
    }

    pub fn insert_position(
        &self,
        code: &str,
        description: &str,
        unit_id: UnitId,
    ) -> RosterResult<Position> {
        let outcome = execute(
            self.conn,
            "INSERT INTO positions (code, description, unit_id) VALUES (?1, ?2, ?3);",
            params![code, description, unit_id],
        )?;
        Ok(Position {
            position_id: outcome.last_insert_id,
            code: code.to_string(),
            description: description.to_string(),
            unit_id,
        })
    }

    pub fn update_position_details(
        &self,
        position_id: PositionId,
        code: &str,
        description: &str,
    ) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "UPDATE positions SET code = ?2, description = ?3 WHERE position_id = ?1;",
            params![position_id, code, description],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn set_position_unit(&self, position_id: PositionId, unit_id: UnitId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "UPDATE positions SET unit_id = ?2 WHERE position_id = ?1;",
            params![position_id, unit_id],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn delete_positions_in_unit(&self, unit_id: UnitId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "DELETE FROM positions WHERE unit_id = ?1;",
            [unit_id],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn delete_position_row(&self, position_id: PositionId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "DELETE FROM positions WHERE position_id = ?1;",
            [position_id],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn get_contract(&self, contract_id: ContractId) -> RosterResult<Option<Contract>> {
        Ok(query_optional(
            self.conn,
            CONTRACT_BY_ID_SQL,
            [contract_id],
            parse_contract_row,
        )?)
    }

    pub fn insert_contract(
        &self,
        person_id: PersonId,
        position_id: PositionId,
        unit_id: UnitId,
        terms: &ContractTerms,
    ) -> RosterResult<Contract> {
        let outcome = execute(
            self.conn,
            "INSERT INTO contracts (
                person_id,
                position_id,
                unit_id,
                start_date,
                end_date,
                years,
                salary_millions,
                cap_hit_millions
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                person_id,
                position_id,
                unit_id,
                terms.start_date,
                terms.end_date,
                terms.years,
                terms.salary_millions,
                terms.cap_hit_millions,
            ],
        )?;
        Ok(Contract {
            contract_id: outcome.last_insert_id,
            person_id,
            position_id,
            unit_id,
            terms: terms.clone(),
        })
    }

    pub fn update_contract_row(&self, contract: &Contract) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "UPDATE contracts
             SET
                person_id = ?2,
                position_id = ?3,
                unit_id = ?4,
                start_date = ?5,
                end_date = ?6,
                years = ?7,
                salary_millions = ?8,
                cap_hit_millions = ?9
             WHERE contract_id = ?1;",
            params![
                contract.contract_id,
                contract.person_id,
                contract.position_id,
                contract.unit_id,
                contract.terms.start_date,
                contract.terms.end_date,
                contract.terms.years,
                contract.terms.salary_millions,
                contract.terms.cap_hit_millions,
            ],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn delete_contract_row(&self, contract_id: ContractId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "DELETE FROM contracts WHERE contract_id = ?1;",
            [contract_id],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn person_ids_in_unit(&self, unit_id: UnitId) -> RosterResult<Vec<PersonId>> {
        Ok(query_all(
            self.conn,
            "SELECT DISTINCT person_id FROM contracts WHERE unit_id = ?1 ORDER BY person_id ASC;",
            [unit_id],
            |row| row.get(0),
        )?)
    }

    pub fn person_ids_for_position(&self, position_id: PositionId) -> RosterResult<Vec<PersonId>> {
        Ok(query_all(
            self.conn,
            "SELECT DISTINCT person_id FROM contracts WHERE position_id = ?1 ORDER BY person_id ASC;",
            [position_id],
            |row| row.get(0),
        )?)
    }

    pub fn delete_contracts_in_unit(&self, unit_id: UnitId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "DELETE FROM contracts WHERE unit_id = ?1;",
            [unit_id],
        )?;
        Ok(outcome.rows_affected)
    }

    pub fn delete_contracts_for_position(&self, position_id: PositionId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "DELETE FROM contracts WHERE position_id = ?1;",
            [position_id],
        )?;
        Ok(outcome.rows_affected)
    }

    /// Rewrites the denormalized unit of every contract on `position_id`.
    pub fn sync_contract_units(&self, position_id: PositionId, unit_id: UnitId) -> RosterResult<usize> {
        let outcome = execute(
            self.conn,
            "UPDATE contracts SET unit_id = ?2 WHERE position_id = ?1;",
            params![position_id, unit_id],
        )?;
        Ok(outcome.rows_affected)
    }
}

pub(crate) fn parse_person_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        person_id: row.get("person_id")?,
        name: row.get("name")?,
    })
}

pub(crate) fn parse_unit_row(row: &Row<'_>) -> rusqlite::Result<Unit> {
    Ok(Unit {
        unit_id: row.get("unit_id")?,
        name: row.get("name")?,
    })
}

pub(crate) fn parse_position_row(row: &Row<'_>) -> rusqlite::Result<Position> {
    Ok(Position {
        position_id: row.get("position_id")?,
        code: row.get("code")?,
        description: row.get("description")?,
        unit_id: row.get("unit_id")?,
    })
}

pub(crate) fn parse_position_listing_row(row: &Row<'_>) -> rusqlite::Result<PositionListing> {
    Ok(PositionListing {
        position: parse_position_row(row)?,
        unit_name: row.get("unit_name")?,
    })
}

pub(crate) fn parse_contract_row(row: &Row<'_>) -> rusqlite::Result<Contract> {
    Ok(Contract {
        contract_id: row.get("contract_id")?,
        person_id: row.get("person_id")?,
        position_id: row.get("position_id")?,
        unit_id: row.get("unit_id")?,
        terms: ContractTerms {
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            years: row.get("years")?,
            salary_millions: row.get("salary_millions")?,
            cap_hit_millions: row.get("cap_hit_millions")?,
        },
    })
}

pub(crate) fn parse_contract_listing_row(row: &Row<'_>) -> rusqlite::Result<ContractListing> {
    Ok(ContractListing {
        contract: parse_contract_row(row)?,
        person_name: row.get("person_name")?,
        position_code: row.get("position_code")?,
        position_description: row.get("position_description")?,
        unit_name: row.get("unit_name")?,
    })
}
