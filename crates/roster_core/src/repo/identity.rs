//! Person identifier allocation.
//!
//! # Invariants
//! - A new person gets the smallest positive integer not used by any person.
//! - The id read and the subsequent insert share one write-locked
//!   transaction, so concurrent creations cannot observe the same gap.

use crate::error::RosterResult;
use crate::model::PersonId;
use crate::repo::roster_repo::SqliteRosterRepository;
use log::debug;
use rusqlite::Transaction;

/// Returns the smallest positive id missing from `sorted_ids`.
///
/// `sorted_ids` must be ascending. The scan advances a candidate starting at
/// 1 for each id equal to it and stops at the first gap.
pub fn lowest_unused_id(sorted_ids: &[PersonId]) -> PersonId {
    let mut candidate: PersonId = 1;
    for &id in sorted_ids {
        if id == candidate {
            candidate += 1;
        } else if id > candidate {
            break;
        }
    }
    candidate
}

/// Reads current person ids inside `tx` and returns the next id to insert.
pub fn allocate_person_id(tx: &Transaction<'_>) -> RosterResult<PersonId> {
    let repo = SqliteRosterRepository::new(tx);
    let existing = repo.list_person_ids()?;
    let person_id = lowest_unused_id(&existing);
    debug!(
        "event=person_allocated module=repo status=ok person_id={} existing_count={}",
        person_id,
        existing.len()
    );
    Ok(person_id)
}

#[cfg(test)]
mod tests {
    use super::lowest_unused_id;

    #[test]
    fn empty_set_starts_at_one() {
        assert_eq!(lowest_unused_id(&[]), 1);
    }

    #[test]
    fn dense_set_appends() {
        assert_eq!(lowest_unused_id(&[1, 2, 3]), 4);
    }

    #[test]
    fn first_gap_wins() {
        assert_eq!(lowest_unused_id(&[1, 2, 4, 5, 7]), 3);
        assert_eq!(lowest_unused_id(&[2, 3]), 1);
    }

    #[test]
    fn non_positive_ids_are_skipped() {
        assert_eq!(lowest_unused_id(&[-3, 0, 1, 3]), 2);
    }
}
