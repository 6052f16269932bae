mod common;

use common::Fixture;
use roster_core::ReportFilters;

fn seeded() -> (Fixture, i64, i64) {
    let fixture = Fixture::new();
    let offense = fixture.unit("Offense");
    let defense = fixture.unit("Defense");
    let qb = fixture.position("QB", &offense);
    let wr = fixture.position("WR", &offense);
    let lb = fixture.position("LB", &defense);

    fixture.contract("Franchise", &qb, 40.0);
    fixture.contract("Deep Threat", &wr, 10.0);
    fixture.contract("Slot", &wr, 5.0);
    fixture.contract("Rookie", &wr, 1.0);
    fixture.contract("Edge", &lb, 7.0);
    (fixture, offense.unit_id, wr.position_id)
}

#[test]
fn unfiltered_report_lists_everything() {
    let (fixture, _, _) = seeded();

    let report = fixture.service.run_report(&ReportFilters::default()).unwrap();

    assert_eq!(report.rows.len(), 5);
    let stats = report.stats.unwrap();
    assert_eq!(stats.count, 5);
    assert!((stats.avg_salary - 12.6).abs() < 1e-9);
}

#[test]
fn salary_range_and_unit_filters_combine() {
    let (fixture, offense_id, _) = seeded();

    let report = fixture
        .service
        .run_report(&ReportFilters {
            unit_id: Some(offense_id),
            min_salary: Some(5.0),
            max_salary: Some(10.0),
            ..ReportFilters::default()
        })
        .unwrap();

    let names = report
        .rows
        .iter()
        .map(|row| row.person_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Deep Threat", "Slot"]);
    assert!(report
        .rows
        .iter()
        .all(|row| (5.0..=10.0).contains(&row.contract.terms.salary_millions)));

    let stats = report.stats.unwrap();
    assert_eq!(stats.count, report.rows.len() as i64);
    assert!((stats.avg_salary - 7.5).abs() < 1e-9);
    let total_cap: f64 = report
        .rows
        .iter()
        .map(|row| row.contract.terms.cap_hit_millions)
        .sum();
    assert!((stats.total_cap_hit - total_cap).abs() < 1e-9);
    assert!((stats.avg_cap_hit - total_cap / 2.0).abs() < 1e-9);
}

#[test]
fn position_filter_narrows_rows() {
    let (fixture, _, wr_id) = seeded();

    let report = fixture
        .service
        .run_report(&ReportFilters {
            position_id: Some(wr_id),
            ..ReportFilters::default()
        })
        .unwrap();

    assert_eq!(report.rows.len(), 3);
    assert!(report
        .rows
        .iter()
        .all(|row| row.contract.position_id == wr_id));
    assert_eq!(report.stats.unwrap().count, 3);
}

#[test]
fn no_matching_rows_yields_no_stats() {
    let (fixture, _, _) = seeded();

    let report = fixture
        .service
        .run_report(&ReportFilters {
            min_salary: Some(100.0),
            ..ReportFilters::default()
        })
        .unwrap();

    assert!(report.rows.is_empty());
    assert!(report.stats.is_none());
}

#[test]
fn empty_store_report_has_no_stats() {
    let fixture = Fixture::new();

    let report = fixture.service.run_report(&ReportFilters::default()).unwrap();

    assert!(report.rows.is_empty());
    assert_eq!(report.stats, None);
}

#[test]
fn report_serializes_with_null_stats_when_empty() {
    let fixture = Fixture::new();

    let report = fixture.service.run_report(&ReportFilters::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["rows"], serde_json::json!([]));
    assert!(json["stats"].is_null());
}
