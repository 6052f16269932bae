//! Report execution over one read snapshot.

use crate::db::executor::{query_all, query_optional};
use crate::db::{SqlText, Store};
use crate::error::RosterResult;
use crate::model::contract::ContractListing;
use crate::repo::roster_repo::{
    parse_contract_listing_row, CONTRACT_LISTING_COLUMNS, CONTRACT_LISTING_FROM,
    CONTRACT_LISTING_ORDER,
};
use crate::report::filter::{FilterPredicate, ReportFilters};
use log::info;
use rusqlite::params_from_iter;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const STATS_COLUMNS: &str = "SELECT
    COUNT(*) AS count_contracts,
    AVG(c.salary_millions) AS avg_salary,
    AVG(c.cap_hit_millions) AS avg_cap_hit,
    SUM(c.cap_hit_millions) AS total_cap_hit";

/// Aggregates over the matching contracts. Only produced for non-empty
/// result sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub count: i64,
    pub avg_salary: f64,
    pub avg_cap_hit: f64,
    pub total_cap_hit: f64,
}

/// Filtered contract rows plus their statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub filters: ReportFilters,
    pub rows: Vec<ContractListing>,
    /// `None` means no contract matched ("no data").
    pub stats: Option<ReportStats>,
}

/// Runs the filtered listing and its statistics against one snapshot.
pub fn run_report(store: &Store, filters: &ReportFilters) -> RosterResult<Report> {
    let started_at = Instant::now();
    let predicate = FilterPredicate::build(filters);

    let rows_sql = SqlText::from_fragments(
        [CONTRACT_LISTING_COLUMNS, CONTRACT_LISTING_FROM]
            .into_iter()
            .chain(predicate.clause_fragments())
            .chain([CONTRACT_LISTING_ORDER]),
    );
    let stats_sql = SqlText::from_fragments(
        [STATS_COLUMNS, CONTRACT_LISTING_FROM]
            .into_iter()
            .chain(predicate.clause_fragments())
            .chain([";"]),
    );

    let (rows, stats) = store.read_snapshot(|conn| -> RosterResult<_> {
        let rows = query_all(
            conn,
            rows_sql,
            params_from_iter(predicate.params()),
            parse_contract_listing_row,
        )?;
        let stats = query_optional(
            conn,
            stats_sql,
            params_from_iter(predicate.params()),
            |row| {
                let count: i64 = row.get("count_contracts")?;
                if count == 0 {
                    return Ok(None);
                }
                Ok(Some(ReportStats {
                    count,
                    avg_salary: row.get("avg_salary")?,
                    avg_cap_hit: row.get("avg_cap_hit")?,
                    total_cap_hit: row.get("total_cap_hit")?,
                }))
            },
        )?
        .flatten();
        Ok((rows, stats))
    })?;

    info!(
        "event=report_run module=report status=ok filters={} rows={} duration_ms={}",
        predicate.params().len(),
        rows.len(),
        started_at.elapsed().as_millis()
    );

    Ok(Report {
        filters: filters.clone(),
        rows,
        stats,
    })
}
