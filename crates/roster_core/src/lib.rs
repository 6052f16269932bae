//! Core domain logic for the roster/contract manager.
//! This crate is the single source of truth for cross-entity invariants.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use db::{DbError, DbResult, Store, StoreOptions};
pub use error::{BusinessRuleViolation, EntityRef, RosterError, RosterResult, UniqueField};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contract::{expected_years, Contract, ContractListing, ContractTerms, TermsViolation};
pub use model::org::{Person, Position, PositionListing, Unit};
pub use model::{ContractId, PersonId, PositionId, UnitId};
pub use repo::integrity::CascadeSummary;
pub use report::filter::{FilterPredicate, ReportFilters};
pub use report::query::{Report, ReportStats};
pub use service::roster_service::{ContractUpdate, NewContract, PositionUpdate, RosterService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
