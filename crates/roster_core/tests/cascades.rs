mod common;

use common::{terms, Fixture};
use roster_core::{EntityRef, PositionUpdate, RosterError};

#[test]
fn delete_unit_removes_its_contracts_positions_and_orphans_only() {
    let fixture = Fixture::new();
    let offense = fixture.unit("Offense");
    let defense = fixture.unit("Defense");
    let qb = fixture.position("QB", &offense);
    let wr = fixture.position("WR", &offense);
    let lb = fixture.position("LB", &defense);

    let x = fixture.contract("Only Offense", &qb, 30.0);
    let both = fixture.contract("Two Way", &wr, 8.0);
    fixture
        .service
        .create_contract_for_person(both.person_id, lb.position_id, defense.unit_id, &terms(6.0))
        .unwrap();
    let y = fixture.contract("Only Defense", &lb, 12.0);

    let summary = fixture.service.delete_unit(offense.unit_id).unwrap();

    assert_eq!(summary.contracts_removed, 2);
    assert_eq!(summary.positions_removed, 2);
    assert_eq!(summary.people_removed, vec![x.person_id]);

    assert!(fixture.service.get_unit(offense.unit_id).unwrap().is_none());
    assert!(fixture.service.get_position(qb.position_id).unwrap().is_none());
    assert!(fixture.service.get_person(x.person_id).unwrap().is_none());
    assert!(fixture.service.get_person(both.person_id).unwrap().is_some());
    let untouched = fixture.service.get_person(y.person_id).unwrap().unwrap();
    assert_eq!(untouched.name, "Only Defense");
    assert_eq!(fixture.contract_count(), 2);
    fixture.assert_invariants();
}

#[test]
fn delete_unit_without_contracts_succeeds() {
    let fixture = Fixture::new();
    let empty = fixture.unit("Special Teams");
    fixture.position("K", &empty);

    let summary = fixture.service.delete_unit(empty.unit_id).unwrap();

    assert_eq!(summary.contracts_removed, 0);
    assert!(summary.people_removed.is_empty());
    assert_eq!(summary.positions_removed, 1);
    assert!(fixture.service.list_units().unwrap().is_empty());
}

#[test]
fn delete_position_removes_contracts_and_orphaned_people() {
    let fixture = Fixture::new();
    let offense = fixture.unit("Offense");
    let qb = fixture.position("QB", &offense);
    let rb = fixture.position("RB", &offense);

    let starter = fixture.contract("Starter", &qb, 30.0);
    let backup = fixture.contract("Backup", &qb, 2.0);
    let runner = fixture.contract("Runner", &rb, 4.0);

    let summary = fixture.service.delete_position(qb.position_id).unwrap();

    assert_eq!(summary.contracts_removed, 2);
    assert_eq!(
        summary.people_removed,
        vec![starter.person_id, backup.person_id]
    );
    assert!(fixture.service.get_position(qb.position_id).unwrap().is_none());
    assert!(fixture.service.get_person(runner.person_id).unwrap().is_some());
    assert!(fixture.service.get_unit(offense.unit_id).unwrap().is_some());
    fixture.assert_invariants();
}

#[test]
fn delete_contract_keeps_person_with_other_contracts() {
    let fixture = Fixture::new();
    let offense = fixture.unit("Offense");
    let qb = fixture.position("QB", &offense);

    let first = fixture.contract("Veteran", &qb, 20.0);
    let second = fixture
        .service
        .create_contract_for_person(first.person_id, qb.position_id, offense.unit_id, &terms(25.0))
        .unwrap();

    let summary = fixture.service.delete_contract(first.contract_id).unwrap();
    assert_eq!(summary.contracts_removed, 1);
    assert!(summary.people_removed.is_empty());
    assert!(fixture.service.get_person(first.person_id).unwrap().is_some());

    let summary = fixture.service.delete_contract(second.contract_id).unwrap();
    assert_eq!(summary.people_removed, vec![first.person_id]);
    assert_eq!(fixture.people_count(), 0);
    fixture.assert_invariants();
}

#[test]
fn deleting_missing_rows_reports_not_found() {
    let fixture = Fixture::new();

    assert!(matches!(
        fixture.service.delete_contract(99),
        Err(RosterError::NotFound(EntityRef::Contract(99)))
    ));
    assert!(matches!(
        fixture.service.delete_unit(7),
        Err(RosterError::NotFound(EntityRef::Unit(7)))
    ));
    assert!(matches!(
        fixture.service.delete_position(3),
        Err(RosterError::NotFound(EntityRef::Position(3)))
    ));
}

#[test]
fn reassign_position_carries_contracts_to_new_unit() {
    let fixture = Fixture::new();
    let offense = fixture.unit("Offense");
    let special = fixture.unit("Special Teams");
    let kr = fixture.position("KR", &offense);
    let contract = fixture.contract("Returner", &kr, 3.0);

    fixture
        .service
        .reassign_position_unit(kr.position_id, special.unit_id)
        .unwrap();

    let moved = fixture.service.get_position(kr.position_id).unwrap().unwrap();
    assert_eq!(moved.unit_id, special.unit_id);
    let stored = fixture
        .service
        .get_contract(contract.contract_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.unit_id, special.unit_id);
    fixture.assert_invariants();

    // Deleting the old unit no longer touches the moved contract.
    fixture.service.delete_unit(offense.unit_id).unwrap();
    assert_eq!(fixture.contract_count(), 1);
    fixture.assert_invariants();
}

#[test]
fn reassign_to_missing_unit_changes_nothing() {
    let fixture = Fixture::new();
    let offense = fixture.unit("Offense");
    let qb = fixture.position("QB", &offense);
    fixture.contract("Starter", &qb, 30.0);

    let err = fixture
        .service
        .reassign_position_unit(qb.position_id, 404)
        .unwrap_err();

    assert!(matches!(err, RosterError::NotFound(EntityRef::Unit(404))));
    let position = fixture.service.get_position(qb.position_id).unwrap().unwrap();
    assert_eq!(position.unit_id, offense.unit_id);
    fixture.assert_invariants();
}

#[test]
fn update_position_with_new_unit_runs_reassignment() {
    let fixture = Fixture::new();
    let offense = fixture.unit("Offense");
    let defense = fixture.unit("Defense");
    let ath = fixture.position("ATH", &offense);
    let contract = fixture.contract("Utility", &ath, 1.5);

    fixture
        .service
        .update_position(&PositionUpdate {
            position_id: ath.position_id,
            code: "DB".to_string(),
            description: "Defensive back".to_string(),
            unit_id: defense.unit_id,
        })
        .unwrap();

    let position = fixture.service.get_position(ath.position_id).unwrap().unwrap();
    assert_eq!(position.code, "DB");
    assert_eq!(position.description, "Defensive back");
    assert_eq!(position.unit_id, defense.unit_id);
    let stored = fixture
        .service
        .get_contract(contract.contract_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.unit_id, defense.unit_id);
    fixture.assert_invariants();
}
