//! Cross-entity rules and cascades.
//!
//! # Responsibility
//! - Check that a position belongs to the unit a contract claims.
//! - Propagate deletes and unit reassignment to dependent rows.
//! - Garbage-collect people left without contracts.
//!
//! # Invariants
//! - Every function takes the `Transaction` of the enclosing unit of work and
//!   never commits; a failure anywhere rolls the whole cascade back.
//! - Statement order is part of each contract: affected people are collected
//!   before their contracts go, and contracts go before the parent row.

use crate::error::{BusinessRuleViolation, EntityRef, RosterError, RosterResult};
use crate::model::{ContractId, PersonId, PositionId, UnitId};
use crate::repo::roster_repo::SqliteRosterRepository;
use log::info;
use rusqlite::Transaction;

/// Rows removed by one cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub contracts_removed: usize,
    /// People deleted because the cascade removed their last contract.
    pub people_removed: Vec<PersonId>,
    pub positions_removed: usize,
}

/// Whether `position_id` is stored under `unit_id`. Missing positions
/// return `false`.
pub fn position_belongs_to_unit(
    tx: &Transaction<'_>,
    position_id: PositionId,
    unit_id: UnitId,
) -> RosterResult<bool> {
    let repo = SqliteRosterRepository::new(tx);
    Ok(repo.position_unit(position_id)? == Some(unit_id))
}

/// Fails with `NotFound` for a missing position and with a business-rule
/// error when the position lives in another unit.
pub fn ensure_position_in_unit(
    tx: &Transaction<'_>,
    position_id: PositionId,
    unit_id: UnitId,
) -> RosterResult<()> {
    let repo = SqliteRosterRepository::new(tx);
    if repo.position_unit(position_id)?.is_none() {
        return Err(RosterError::NotFound(EntityRef::Position(position_id)));
    }
    if !position_belongs_to_unit(tx, position_id, unit_id)? {
        return Err(BusinessRuleViolation::PositionNotInUnit {
            position_id,
            unit_id,
        }
        .into());
    }
    Ok(())
}

/// Deletes each candidate person that no longer has any contract.
///
/// Returns the ids actually deleted, in candidate order.
pub fn remove_orphaned_people(
    tx: &Transaction<'_>,
    candidates: &[PersonId],
) -> RosterResult<Vec<PersonId>> {
    let repo = SqliteRosterRepository::new(tx);
    let mut removed = Vec::new();
    for &person_id in candidates {
        if repo.count_contracts_for_person(person_id)? == 0 {
            repo.delete_person(person_id)?;
            removed.push(person_id);
        }
    }
    Ok(removed)
}

/// Deletes one contract and its person when orphaned.
///
/// Order:
/// 1. read the contract's person,
/// 2. delete the contract,
/// 3. delete the person if it has no contracts left.
pub fn delete_contract_cascade(
    tx: &Transaction<'_>,
    contract_id: ContractId,
) -> RosterResult<CascadeSummary> {
    let repo = SqliteRosterRepository::new(tx);
    let contract = repo
        .get_contract(contract_id)?
        .ok_or(RosterError::NotFound(EntityRef::Contract(contract_id)))?;

    let contracts_removed = repo.delete_contract_row(contract_id)?;
    let people_removed = remove_orphaned_people(tx, &[contract.person_id])?;

    info!(
        "event=cascade_delete_contract module=repo status=ok contract_id={} people_removed={}",
        contract_id,
        people_removed.len()
    );
    Ok(CascadeSummary {
        contracts_removed,
        people_removed,
        positions_removed: 0,
    })
}

/// Deletes a unit with everything hanging off it.
///
/// Order:
/// 1. collect distinct people with contracts in the unit,
/// 2. delete those contracts,
/// 3. delete each collected person that is now orphaned,
/// 4. delete the unit's positions,
/// 5. delete the unit.
///
/// People with contracts in other units keep those contracts.
pub fn delete_unit_cascade(tx: &Transaction<'_>, unit_id: UnitId) -> RosterResult<CascadeSummary> {
    let repo = SqliteRosterRepository::new(tx);
    if repo.get_unit(unit_id)?.is_none() {
        return Err(RosterError::NotFound(EntityRef::Unit(unit_id)));
    }

    let affected = repo.person_ids_in_unit(unit_id)?;
    let contracts_removed = repo.delete_contracts_in_unit(unit_id)?;
    let people_removed = remove_orphaned_people(tx, &affected)?;
    let positions_removed = repo.delete_positions_in_unit(unit_id)?;
    repo.delete_unit_row(unit_id)?;

    info!(
        "event=cascade_delete_unit module=repo status=ok unit_id={} contracts_removed={} people_removed={} positions_removed={}",
        unit_id,
        contracts_removed,
        people_removed.len(),
        positions_removed
    );
    Ok(CascadeSummary {
        contracts_removed,
        people_removed,
        positions_removed,
    })
}

/// Deletes a position with its contracts.
///
/// Order:
/// 1. collect distinct people with contracts on the position,
/// 2. delete those contracts,
/// 3. delete each collected person that is now orphaned,
/// 4. delete the position.
pub fn delete_position_cascade(
    tx: &Transaction<'_>,
    position_id: PositionId,
) -> RosterResult<CascadeSummary> {
    let repo = SqliteRosterRepository::new(tx);
    if repo.get_position(position_id)?.is_none() {
        return Err(RosterError::NotFound(EntityRef::Position(position_id)));
    }

    let affected = repo.person_ids_for_position(position_id)?;
    let contracts_removed = repo.delete_contracts_for_position(position_id)?;
    let people_removed = remove_orphaned_people(tx, &affected)?;
    let positions_removed = repo.delete_position_row(position_id)?;

    info!(
        "event=cascade_delete_position module=repo status=ok position_id={} contracts_removed={} people_removed={}",
        position_id,
        contracts_removed,
        people_removed.len()
    );
    Ok(CascadeSummary {
        contracts_removed,
        people_removed,
        positions_removed,
    })
}

/// Moves a position to another unit and carries its contracts along.
///
/// Order:
/// 1. check the position and the target unit exist,
/// 2. update the position's unit,
/// 3. rewrite `unit_id` on every contract referencing the position.
///
/// Returns the number of contracts rewritten.
pub fn reassign_position_cascade(
    tx: &Transaction<'_>,
    position_id: PositionId,
    unit_id: UnitId,
) -> RosterResult<usize> {
    let repo = SqliteRosterRepository::new(tx);
    if repo.get_position(position_id)?.is_none() {
        return Err(RosterError::NotFound(EntityRef::Position(position_id)));
    }
    if repo.get_unit(unit_id)?.is_none() {
        return Err(RosterError::NotFound(EntityRef::Unit(unit_id)));
    }

    repo.set_position_unit(position_id, unit_id)?;
    let contracts_synced = repo.sync_contract_units(position_id, unit_id)?;

    info!(
        "event=cascade_reassign_position module=repo status=ok position_id={} unit_id={} contracts_synced={}",
        position_id, unit_id, contracts_synced
    );
    Ok(contracts_synced)
}
