#![allow(dead_code)]

use chrono::NaiveDate;
use roster_core::{
    Contract, ContractTerms, NewContract, Position, RosterService, Store, Unit, UnitId,
};
use rusqlite::Connection;
use tempfile::TempDir;

pub struct Fixture {
    // Keeps the database directory alive for the test's duration.
    _dir: TempDir,
    pub service: RosterService,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("roster.sqlite3")).unwrap();
        Self {
            _dir: dir,
            service: RosterService::new(store),
        }
    }

    pub fn raw(&self) -> Connection {
        Connection::open(self.service.store().path()).unwrap()
    }

    pub fn unit(&self, name: &str) -> Unit {
        self.service.create_unit(name).unwrap()
    }

    pub fn position(&self, code: &str, unit: &Unit) -> Position {
        self.service
            .create_position(code, &format!("{code} description"), unit.unit_id)
            .unwrap()
    }

    pub fn contract(&self, name: &str, position: &Position, salary: f64) -> Contract {
        self.service
            .create_contract(&new_contract(name, position.position_id, position.unit_id, salary))
            .unwrap()
    }

    pub fn people_count(&self) -> i64 {
        self.raw()
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
            .unwrap()
    }

    pub fn contract_count(&self) -> i64 {
        self.raw()
            .query_row("SELECT COUNT(*) FROM contracts;", [], |row| row.get(0))
            .unwrap()
    }

    /// Checks the invariants that must hold after every committed operation.
    pub fn assert_invariants(&self) {
        let conn = self.raw();
        let mismatched: i64 = conn
            .query_row(
                "SELECT COUNT(*)
                 FROM contracts c
                 JOIN positions p ON c.position_id = p.position_id
                 WHERE c.unit_id != p.unit_id;",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(mismatched, 0, "contract unit differs from its position's unit");

        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*)
                 FROM people
                 WHERE person_id NOT IN (SELECT person_id FROM contracts);",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0, "person without contracts");
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn terms(salary: f64) -> ContractTerms {
    ContractTerms::new(date(2024, 3, 1), date(2026, 3, 1), salary, salary * 0.8)
}

pub fn new_contract(name: &str, position_id: i64, unit_id: UnitId, salary: f64) -> NewContract {
    NewContract {
        person_name: name.to_string(),
        position_id,
        unit_id,
        terms: terms(salary),
    }
}
