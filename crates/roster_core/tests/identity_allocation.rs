mod common;

use common::{new_contract, Fixture};
use std::sync::Arc;
use std::thread;

#[test]
fn new_people_receive_sequential_ids_from_one() {
    let fixture = Fixture::new();
    let unit = fixture.unit("Offense");
    let position = fixture.position("QB", &unit);

    let ids = (0..4)
        .map(|i| {
            fixture
                .contract(&format!("Player {i}"), &position, 10.0)
                .person_id
        })
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![1, 2, 3, 4]);
    fixture.assert_invariants();
}

#[test]
fn freed_id_is_reused_before_extending_the_range() {
    let fixture = Fixture::new();
    let unit = fixture.unit("Offense");
    let position = fixture.position("QB", &unit);

    let contracts = (0..4)
        .map(|i| fixture.contract(&format!("Player {i}"), &position, 10.0))
        .collect::<Vec<_>>();

    let summary = fixture
        .service
        .delete_contract(contracts[1].contract_id)
        .unwrap();
    assert_eq!(summary.people_removed, vec![2]);

    let refill = fixture.contract("Replacement", &position, 12.0);
    assert_eq!(refill.person_id, 2);

    let next = fixture.contract("Newcomer", &position, 12.0);
    assert_eq!(next.person_id, 5);
    fixture.assert_invariants();
}

#[test]
fn duplicate_names_get_distinct_people() {
    let fixture = Fixture::new();
    let unit = fixture.unit("Offense");
    let position = fixture.position("QB", &unit);

    let first = fixture.contract("Sam Lee", &position, 10.0);
    let second = fixture.contract("Sam Lee", &position, 11.0);

    assert_ne!(first.person_id, second.person_id);
    assert_eq!(fixture.people_count(), 2);
}

#[test]
fn concurrent_creations_never_share_a_person_id() {
    let fixture = Arc::new(Fixture::new());
    let unit = fixture.unit("Offense");
    let position = fixture.position("QB", &unit);

    let handles = (0..8)
        .map(|i| {
            let fixture = Arc::clone(&fixture);
            let (position_id, unit_id) = (position.position_id, position.unit_id);
            thread::spawn(move || {
                fixture
                    .service
                    .create_contract(&new_contract(
                        &format!("Thread {i}"),
                        position_id,
                        unit_id,
                        5.0,
                    ))
                    .unwrap()
                    .person_id
            })
        })
        .collect::<Vec<_>>();

    let mut ids = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();
    ids.sort_unstable();

    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    fixture.assert_invariants();
}
