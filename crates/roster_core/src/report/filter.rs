//! Report filter criteria and predicate composition.

use crate::model::{PositionId, UnitId};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

const UNIT_FRAGMENT: &str = "c.unit_id = ?";
const POSITION_FRAGMENT: &str = "c.position_id = ?";
const MIN_SALARY_FRAGMENT: &str = "c.salary_millions >= ?";
const MAX_SALARY_FRAGMENT: &str = "c.salary_millions <= ?";

/// Optional report filters; absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilters {
    pub unit_id: Option<UnitId>,
    pub position_id: Option<PositionId>,
    /// Inclusive lower salary bound, in millions.
    pub min_salary: Option<f64>,
    /// Inclusive upper salary bound, in millions.
    pub max_salary: Option<f64>,
}

/// `WHERE` predicate built from static fragments plus their bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    fragments: Vec<&'static str>,
    params: Vec<Value>,
}

impl FilterPredicate {
    /// Builds the predicate: one fragment and one parameter per present
    /// filter, in unit, position, min salary, max salary order.
    pub fn build(filters: &ReportFilters) -> Self {
        let mut predicate = Self {
            fragments: Vec::new(),
            params: Vec::new(),
        };

        if let Some(unit_id) = filters.unit_id {
            predicate.push(UNIT_FRAGMENT, Value::Integer(unit_id));
        }
        if let Some(position_id) = filters.position_id {
            predicate.push(POSITION_FRAGMENT, Value::Integer(position_id));
        }
        if let Some(min_salary) = filters.min_salary {
            predicate.push(MIN_SALARY_FRAGMENT, Value::Real(min_salary));
        }
        if let Some(max_salary) = filters.max_salary {
            predicate.push(MAX_SALARY_FRAGMENT, Value::Real(max_salary));
        }

        predicate
    }

    fn push(&mut self, fragment: &'static str, value: Value) {
        self.fragments.push(fragment);
        self.params.push(value);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Static fragments of the `WHERE` clause, including the leading
    /// `WHERE`; empty when no filter is present.
    pub fn clause_fragments(&self) -> Vec<&'static str> {
        let mut clause = Vec::with_capacity(self.fragments.len() * 2);
        for (index, fragment) in self.fragments.iter().enumerate() {
            clause.push(if index == 0 { "\nWHERE " } else { " AND " });
            clause.push(*fragment);
        }
        clause
    }

    /// Bound values, aligned with the placeholders of [`clause_fragments`].
    ///
    /// [`clause_fragments`]: FilterPredicate::clause_fragments
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterPredicate, ReportFilters};
    use rusqlite::types::Value;

    #[test]
    fn no_filters_build_no_clause() {
        let predicate = FilterPredicate::build(&ReportFilters::default());
        assert!(predicate.is_empty());
        assert!(predicate.clause_fragments().is_empty());
        assert!(predicate.params().is_empty());
    }

    #[test]
    fn salary_range_builds_two_bound_comparisons() {
        let predicate = FilterPredicate::build(&ReportFilters {
            min_salary: Some(5.0),
            max_salary: Some(10.0),
            ..ReportFilters::default()
        });

        assert_eq!(
            predicate.clause_fragments().concat(),
            "\nWHERE c.salary_millions >= ? AND c.salary_millions <= ?"
        );
        assert_eq!(predicate.params(), &[Value::Real(5.0), Value::Real(10.0)]);
    }

    #[test]
    fn all_filters_keep_fragment_and_param_order() {
        let predicate = FilterPredicate::build(&ReportFilters {
            unit_id: Some(3),
            position_id: Some(9),
            min_salary: Some(1.5),
            max_salary: Some(2.5),
        });

        assert_eq!(
            predicate.clause_fragments().concat(),
            "\nWHERE c.unit_id = ? AND c.position_id = ? AND c.salary_millions >= ? AND c.salary_millions <= ?"
        );
        assert_eq!(
            predicate.params(),
            &[
                Value::Integer(3),
                Value::Integer(9),
                Value::Real(1.5),
                Value::Real(2.5)
            ]
        );
    }

    #[test]
    fn placeholder_count_matches_param_count() {
        let predicate = FilterPredicate::build(&ReportFilters {
            position_id: Some(4),
            max_salary: Some(7.0),
            ..ReportFilters::default()
        });
        let placeholders = predicate.clause_fragments().concat().matches('?').count();
        assert_eq!(placeholders, predicate.params().len());
    }
}
