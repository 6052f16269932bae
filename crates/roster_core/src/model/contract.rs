//! Contract records and term rules.
//!
//! # Invariants
//! - `end_date >= start_date`.
//! - `years == max(1, end_date.year - start_date.year)`.

use super::{ContractId, PersonId, PositionId, UnitId};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Dated and priced part of a contract, independent of who/where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Whole contract years; must match [`expected_years`].
    pub years: i64,
    pub salary_millions: f64,
    pub cap_hit_millions: f64,
}

impl ContractTerms {
    /// Builds terms with `years` derived from the dates.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        salary_millions: f64,
        cap_hit_millions: f64,
    ) -> Self {
        Self {
            start_date,
            end_date,
            years: expected_years(start_date, end_date),
            salary_millions,
            cap_hit_millions,
        }
    }

    /// Checks date order and the year-count rule.
    pub fn validate(&self) -> Result<(), TermsViolation> {
        for date in [self.start_date, self.end_date] {
            if !STORABLE_YEARS.contains(&date.year()) {
                return Err(TermsViolation::DateOutOfRange { date });
            }
        }
        if self.end_date < self.start_date {
            return Err(TermsViolation::EndBeforeStart {
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }

        let expected = expected_years(self.start_date, self.end_date);
        if self.years != expected {
            return Err(TermsViolation::YearsMismatch {
                expected,
                actual: self.years,
            });
        }

        Ok(())
    }
}

/// Years whose dates keep their order when stored as `YYYY-MM-DD` text.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Year count implied by a date range: calendar-year difference, at least 1.
pub fn expected_years(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    let diff = i64::from(end_date.year()) - i64::from(start_date.year());
    diff.max(1)
}

/// Contract term rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermsViolation {
    EndBeforeStart {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    YearsMismatch {
        expected: i64,
        actual: i64,
    },
    /// Date outside the four-digit year range.
    DateOutOfRange {
        date: NaiveDate,
    },
}

impl Display for TermsViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndBeforeStart {
                start_date,
                end_date,
            } => write!(
                f,
                "end date {end_date} cannot be before start date {start_date}"
            ),
            Self::YearsMismatch { expected, actual } => write!(
                f,
                "years must equal {expected} based on start/end date, got {actual}"
            ),
            Self::DateOutOfRange { date } => {
                write!(f, "date {date} must fall in years 0000 to 9999")
            }
        }
    }
}

impl Error for TermsViolation {}

/// Persisted contract row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: ContractId,
    pub person_id: PersonId,
    pub position_id: PositionId,
    /// Denormalized copy of the position's unit.
    pub unit_id: UnitId,
    #[serde(flatten)]
    pub terms: ContractTerms,
}

/// Contract joined with person, position and unit labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractListing {
    pub contract: Contract,
    pub person_name: String,
    pub position_code: String,
    pub position_description: String,
    pub unit_name: String,
}
