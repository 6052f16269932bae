//! Roster use-case service.
//!
//! # Responsibility
//! - Expose the operations the presentation layer calls.
//! - Run every mutation as exactly one unit of work.
//!
//! # Invariants
//! - Business rules are checked before the first write of a unit of work.
//! - A contract's stored `unit_id` is the position's unit read under the
//!   write lock, after the claimed pairing was verified.
//! - A person left without contracts by any operation is deleted in the same
//!   unit of work.

use crate::db::{SqlText, Store};
use crate::error::{BusinessRuleViolation, EntityRef, RosterError, RosterResult};
use crate::model::contract::{Contract, ContractListing, ContractTerms};
use crate::model::org::{Person, Position, PositionListing, Unit};
use crate::model::{ContractId, PersonId, PositionId, UnitId};
use crate::repo::identity::allocate_person_id;
use crate::repo::integrity::{
    delete_contract_cascade, delete_position_cascade, delete_unit_cascade,
    ensure_position_in_unit, reassign_position_cascade, remove_orphaned_people, CascadeSummary,
};
use crate::repo::roster_repo::{
    parse_contract_listing_row, parse_contract_row, parse_person_row, parse_position_listing_row,
    parse_position_row, parse_unit_row, SqliteRosterRepository, CONTRACT_BY_ID_SQL,
    CONTRACT_LISTING_COLUMNS, CONTRACT_LISTING_FROM, CONTRACT_LISTING_ORDER, PERSON_BY_ID_SQL,
    POSITION_BY_ID_SQL, POSITION_LISTING_SQL, UNITS_SQL, UNIT_BY_ID_SQL,
};
use crate::report::filter::ReportFilters;
use crate::report::query::{run_report, Report};
use log::info;

/// Input for a contract that creates its person.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub person_name: String,
    pub position_id: PositionId,
    pub unit_id: UnitId,
    pub terms: ContractTerms,
}

/// Full replacement of an existing contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractUpdate {
    pub contract_id: ContractId,
    pub person_id: PersonId,
    pub position_id: PositionId,
    pub unit_id: UnitId,
    pub terms: ContractTerms,
}

/// Replacement values for a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate {
    pub position_id: PositionId,
    pub code: String,
    pub description: String,
    pub unit_id: UnitId,
}

/// Roster service facade over one store.
#[derive(Debug, Clone)]
pub struct RosterService {
    store: Store,
}

impl RosterService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Creates a contract together with a new person.
    ///
    /// The person id is the lowest free positive integer, allocated in the
    /// same unit of work as both inserts.
    pub fn create_contract(&self, input: &NewContract) -> RosterResult<Contract> {
        let person_name = normalize_required(&input.person_name, "person name")?;
        input.terms.validate()?;

        let contract = self.store.run_in_transaction(|tx| -> RosterResult<Contract> {
            ensure_position_in_unit(tx, input.position_id, input.unit_id)?;

            let person_id = allocate_person_id(tx)?;
            let repo = SqliteRosterRepository::new(tx);
            repo.insert_person(person_id, person_name.as_str())?;
            repo.insert_contract(person_id, input.position_id, input.unit_id, &input.terms)
        })?;

        info!(
            "event=contract_create module=service status=ok contract_id={} person_id={}",
            contract.contract_id, contract.person_id
        );
        Ok(contract)
    }

    /// Adds another contract for an existing person.
    pub fn create_contract_for_person(
        &self,
        person_id: PersonId,
        position_id: PositionId,
        unit_id: UnitId,
        terms: &ContractTerms,
    ) -> RosterResult<Contract> {
        terms.validate()?;

        let contract = self.store.run_in_transaction(|tx| -> RosterResult<Contract> {
            let repo = SqliteRosterRepository::new(tx);
            if repo.get_person(person_id)?.is_none() {
                return Err(RosterError::NotFound(EntityRef::Person(person_id)));
            }
            ensure_position_in_unit(tx, position_id, unit_id)?;
            repo.insert_contract(person_id, position_id, unit_id, terms)
        })?;

        info!(
            "event=contract_create module=service status=ok contract_id={} person_id={}",
            contract.contract_id, contract.person_id
        );
        Ok(contract)
    }

    /// Replaces every field of a contract.
    ///
    /// Moving the contract to another person deletes the previous person
    /// when this was its last contract.
    pub fn update_contract(&self, update: &ContractUpdate) -> RosterResult<()> {
        update.terms.validate()?;

        let released = self.store.run_in_transaction(|tx| -> RosterResult<Vec<PersonId>> {
            let repo = SqliteRosterRepository::new(tx);
            let current = repo
                .get_contract(update.contract_id)?
                .ok_or(RosterError::NotFound(EntityRef::Contract(update.contract_id)))?;
            if repo.get_person(update.person_id)?.is_none() {
                return Err(RosterError::NotFound(EntityRef::Person(update.person_id)));
            }
            ensure_position_in_unit(tx, update.position_id, update.unit_id)?;

            repo.update_contract_row(&Contract {
                contract_id: update.contract_id,
                person_id: update.person_id,
                position_id: update.position_id,
                unit_id: update.unit_id,
                terms: update.terms.clone(),
            })?;

            if current.person_id != update.person_id {
                return remove_orphaned_people(tx, &[current.person_id]);
            }
            Ok(Vec::new())
        })?;

        info!(
            "event=contract_update module=service status=ok contract_id={} people_removed={}",
            update.contract_id,
            released.len()
        );
        Ok(())
    }

    /// Deletes a contract and its person when orphaned.
    pub fn delete_contract(&self, contract_id: ContractId) -> RosterResult<CascadeSummary> {
        self.store
            .run_in_transaction(|tx| delete_contract_cascade(tx, contract_id))
    }

    pub fn create_unit(&self, name: &str) -> RosterResult<Unit> {
        let name = normalize_required(name, "unit name")?;
        let unit = self
            .store
            .run_in_transaction(|tx| SqliteRosterRepository::new(tx).insert_unit(&name))?;
        info!(
            "event=unit_create module=service status=ok unit_id={}",
            unit.unit_id
        );
        Ok(unit)
    }

    pub fn rename_unit(&self, unit_id: UnitId, name: &str) -> RosterResult<()> {
        let name = normalize_required(name, "unit name")?;
        self.store.run_in_transaction(|tx| -> RosterResult<()> {
            let changed = SqliteRosterRepository::new(tx).rename_unit(unit_id, &name)?;
            if changed == 0 {
                return Err(RosterError::NotFound(EntityRef::Unit(unit_id)));
            }
            Ok(())
        })
    }

    /// Deletes a unit, its positions, their contracts and orphaned people.
    pub fn delete_unit(&self, unit_id: UnitId) -> RosterResult<CascadeSummary> {
        self.store
            .run_in_transaction(|tx| delete_unit_cascade(tx, unit_id))
    }

    pub fn create_position(
        &self,
        code: &str,
        description: &str,
        unit_id: UnitId,
    ) -> RosterResult<Position> {
        let code = normalize_required(code, "position code")?;
        let description = normalize_required(description, "position description")?;

        let position = self.store.run_in_transaction(|tx| -> RosterResult<Position> {
            let repo = SqliteRosterRepository::new(tx);
            if repo.get_unit(unit_id)?.is_none() {
                return Err(RosterError::NotFound(EntityRef::Unit(unit_id)));
            }
            repo.insert_position(&code, &description, unit_id)
        })?;

        info!(
            "event=position_create module=service status=ok position_id={} unit_id={}",
            position.position_id, position.unit_id
        );
        Ok(position)
    }

    /// Updates code, description and unit of a position; a unit change
    /// carries every contract on the position along.
    pub fn update_position(&self, update: &PositionUpdate) -> RosterResult<()> {
        let code = normalize_required(&update.code, "position code")?;
        let description = normalize_required(&update.description, "position description")?;

        self.store.run_in_transaction(|tx| -> RosterResult<()> {
            let repo = SqliteRosterRepository::new(tx);
            let current = repo
                .get_position(update.position_id)?
                .ok_or(RosterError::NotFound(EntityRef::Position(update.position_id)))?;

            repo.update_position_details(update.position_id, &code, &description)?;
            if current.unit_id != update.unit_id {
                reassign_position_cascade(tx, update.position_id, update.unit_id)?;
            }
            Ok(())
        })
    }

    /// Moves a position to another unit together with its contracts.
    pub fn reassign_position_unit(
        &self,
        position_id: PositionId,
        unit_id: UnitId,
    ) -> RosterResult<()> {
        self.store.run_in_transaction(|tx| -> RosterResult<()> {
            reassign_position_cascade(tx, position_id, unit_id)?;
            Ok(())
        })
    }

    /// Deletes a position, its contracts and orphaned people.
    pub fn delete_position(&self, position_id: PositionId) -> RosterResult<CascadeSummary> {
        self.store
            .run_in_transaction(|tx| delete_position_cascade(tx, position_id))
    }

    pub fn get_person(&self, person_id: PersonId) -> RosterResult<Option<Person>> {
        Ok(self
            .store
            .query_optional(PERSON_BY_ID_SQL, [person_id], parse_person_row)?)
    }

    pub fn get_unit(&self, unit_id: UnitId) -> RosterResult<Option<Unit>> {
        Ok(self
            .store
            .query_optional(UNIT_BY_ID_SQL, [unit_id], parse_unit_row)?)
    }

    /// Units ordered by name.
    pub fn list_units(&self) -> RosterResult<Vec<Unit>> {
        Ok(self.store.query_all(UNITS_SQL, [], parse_unit_row)?)
    }

    pub fn get_position(&self, position_id: PositionId) -> RosterResult<Option<Position>> {
        Ok(self
            .store
            .query_optional(POSITION_BY_ID_SQL, [position_id], parse_position_row)?)
    }

    /// Positions with unit names, ordered by unit name then code.
    pub fn list_positions(&self) -> RosterResult<Vec<PositionListing>> {
        Ok(self
            .store
            .query_all(POSITION_LISTING_SQL, [], parse_position_listing_row)?)
    }

    pub fn get_contract(&self, contract_id: ContractId) -> RosterResult<Option<Contract>> {
        Ok(self
            .store
            .query_optional(CONTRACT_BY_ID_SQL, [contract_id], parse_contract_row)?)
    }

    /// Every contract with person, position and unit labels, ordered by
    /// person id.
    pub fn list_contracts(&self) -> RosterResult<Vec<ContractListing>> {
        let sql = SqlText::from_fragments([
            CONTRACT_LISTING_COLUMNS,
            CONTRACT_LISTING_FROM,
            CONTRACT_LISTING_ORDER,
        ]);
        Ok(self.store.query_all(sql, [], parse_contract_listing_row)?)
    }

    /// Filtered contract listing with matching statistics.
    pub fn run_report(&self, filters: &ReportFilters) -> RosterResult<Report> {
        run_report(&self.store, filters)
    }
}

fn normalize_required(value: &str, field: &'static str) -> RosterResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BusinessRuleViolation::BlankField(field).into());
    }
    Ok(trimmed.to_string())
}
