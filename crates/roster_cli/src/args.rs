//! Command-line argument definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about = "Front-office roster and contract manager")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalOpts {
    /// SQLite database file
    #[arg(long, global = true, env = "ROSTER_DB", default_value = "roster.sqlite3")]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "ROSTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "ROSTER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database file and apply the schema
    Init,

    /// Unit management
    #[command(subcommand)]
    Unit(UnitCommands),

    /// Position management
    #[command(subcommand)]
    Position(PositionCommands),

    /// Contract management
    #[command(subcommand)]
    Contract(ContractCommands),

    /// Filtered contract report with statistics
    Report(ReportArgs),
}

#[derive(Subcommand, Debug)]
pub enum UnitCommands {
    /// Add a unit
    Add { name: String },
    /// List units by name
    List,
    /// Rename a unit
    Rename { unit_id: i64, name: String },
    /// Delete a unit with its positions and contracts
    Delete { unit_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum PositionCommands {
    /// Add a position to a unit
    Add {
        code: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        unit: i64,
    },
    /// List positions grouped by unit
    List,
    /// Replace code, description and unit of a position
    Update {
        position_id: i64,
        #[arg(long)]
        code: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        unit: i64,
    },
    /// Move a position and its contracts to another unit
    Move {
        position_id: i64,
        #[arg(long)]
        unit: i64,
    },
    /// Delete a position with its contracts
    Delete { position_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ContractCommands {
    /// Add a contract for a new person (--name) or an existing one (--person)
    Add {
        #[arg(long, conflicts_with = "person", required_unless_present = "person")]
        name: Option<String>,
        #[arg(long)]
        person: Option<i64>,
        #[command(flatten)]
        terms: TermsArgs,
    },
    /// List contracts by person
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replace every field of a contract
    Update {
        contract_id: i64,
        #[arg(long)]
        person: i64,
        #[command(flatten)]
        terms: TermsArgs,
    },
    /// Delete a contract
    Delete { contract_id: i64 },
}

#[derive(Args, Debug, Clone)]
pub struct TermsArgs {
    #[arg(long)]
    pub position: i64,
    #[arg(long)]
    pub unit: i64,
    /// Start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: NaiveDate,
    /// End date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub end: NaiveDate,
    /// Contract length; derived from the dates when omitted
    #[arg(long)]
    pub years: Option<i64>,
    /// Salary in millions
    #[arg(long, value_parser = parse_amount)]
    pub salary: f64,
    /// Cap hit in millions
    #[arg(long, value_parser = parse_amount)]
    pub cap_hit: f64,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long)]
    pub unit: Option<i64>,
    #[arg(long)]
    pub position: Option<i64>,
    /// Minimum salary in millions, inclusive
    #[arg(long, value_parser = parse_amount)]
    pub min_salary: Option<f64>,
    /// Maximum salary in millions, inclusive
    #[arg(long, value_parser = parse_amount)]
    pub max_salary: Option<f64>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{value}`: {err}"))
}

fn parse_amount(value: &str) -> Result<f64, String> {
    let amount: f64 = value
        .parse()
        .map_err(|err| format!("expected a number, got `{value}`: {err}"))?;
    if !amount.is_finite() {
        return Err(format!("expected a finite number, got `{value}`"));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::{parse_amount, parse_date, Cli};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert!(parse_date("2024-03-01").is_ok());
        assert!(parse_date("03/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn parse_amount_rejects_non_finite_values() {
        assert_eq!(parse_amount("7.5"), Ok(7.5));
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("ten").is_err());
    }
}
