//! Subcommand handlers over `RosterService`.

use crate::args::{
    Commands, ContractCommands, PositionCommands, ReportArgs, TermsArgs, UnitCommands,
};
use roster_core::{
    CascadeSummary, ContractTerms, ContractUpdate, NewContract, PositionUpdate, ReportFilters,
    RosterService,
};
use std::error::Error;

pub type CommandResult = Result<(), Box<dyn Error>>;

pub fn run(service: &RosterService, command: Commands) -> CommandResult {
    match command {
        Commands::Init => {
            println!(
                "initialized {} roster_core={}",
                service.store().path().display(),
                roster_core::core_version()
            );
            Ok(())
        }
        Commands::Unit(cmd) => run_unit(service, cmd),
        Commands::Position(cmd) => run_position(service, cmd),
        Commands::Contract(cmd) => run_contract(service, cmd),
        Commands::Report(args) => run_report(service, args),
    }
}

fn run_unit(service: &RosterService, cmd: UnitCommands) -> CommandResult {
    match cmd {
        UnitCommands::Add { name } => {
            let unit = service.create_unit(&name)?;
            println!("created unit {} {}", unit.unit_id, unit.name);
        }
        UnitCommands::List => {
            for unit in service.list_units()? {
                println!("{}\t{}", unit.unit_id, unit.name);
            }
        }
        UnitCommands::Rename { unit_id, name } => {
            service.rename_unit(unit_id, &name)?;
            println!("renamed unit {unit_id}");
        }
        UnitCommands::Delete { unit_id } => {
            let summary = service.delete_unit(unit_id)?;
            print_cascade("unit", unit_id, &summary);
        }
    }
    Ok(())
}

fn run_position(service: &RosterService, cmd: PositionCommands) -> CommandResult {
    match cmd {
        PositionCommands::Add {
            code,
            description,
            unit,
        } => {
            let position = service.create_position(&code, &description, unit)?;
            println!(
                "created position {} {} in unit {}",
                position.position_id, position.code, position.unit_id
            );
        }
        PositionCommands::List => {
            for listing in service.list_positions()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    listing.position.position_id,
                    listing.unit_name,
                    listing.position.code,
                    listing.position.description
                );
            }
        }
        PositionCommands::Update {
            position_id,
            code,
            description,
            unit,
        } => {
            service.update_position(&PositionUpdate {
                position_id,
                code,
                description,
                unit_id: unit,
            })?;
            println!("updated position {position_id}");
        }
        PositionCommands::Move { position_id, unit } => {
            service.reassign_position_unit(position_id, unit)?;
            println!("moved position {position_id} to unit {unit}");
        }
        PositionCommands::Delete { position_id } => {
            let summary = service.delete_position(position_id)?;
            print_cascade("position", position_id, &summary);
        }
    }
    Ok(())
}

fn run_contract(service: &RosterService, cmd: ContractCommands) -> CommandResult {
    match cmd {
        ContractCommands::Add {
            name,
            person,
            terms,
        } => {
            let contract_terms = to_terms(&terms);
            let contract = match (name, person) {
                (_, Some(person_id)) => service.create_contract_for_person(
                    person_id,
                    terms.position,
                    terms.unit,
                    &contract_terms,
                )?,
                (Some(person_name), None) => service.create_contract(&NewContract {
                    person_name,
                    position_id: terms.position,
                    unit_id: terms.unit,
                    terms: contract_terms,
                })?,
                (None, None) => return Err("either --name or --person is required".into()),
            };
            println!(
                "created contract {} for person {}",
                contract.contract_id, contract.person_id
            );
        }
        ContractCommands::List { json } => {
            let contracts = service.list_contracts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contracts)?);
            } else {
                for listing in contracts {
                    let terms = &listing.contract.terms;
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}..{}\t{:.2}\t{:.2}",
                        listing.contract.contract_id,
                        listing.contract.person_id,
                        listing.person_name,
                        listing.position_code,
                        listing.unit_name,
                        terms.start_date,
                        terms.end_date,
                        terms.salary_millions,
                        terms.cap_hit_millions
                    );
                }
            }
        }
        ContractCommands::Update {
            contract_id,
            person,
            terms,
        } => {
            service.update_contract(&ContractUpdate {
                contract_id,
                person_id: person,
                position_id: terms.position,
                unit_id: terms.unit,
                terms: to_terms(&terms),
            })?;
            println!("updated contract {contract_id}");
        }
        ContractCommands::Delete { contract_id } => {
            let summary = service.delete_contract(contract_id)?;
            print_cascade("contract", contract_id, &summary);
        }
    }
    Ok(())
}

fn run_report(service: &RosterService, args: ReportArgs) -> CommandResult {
    let report = service.run_report(&ReportFilters {
        unit_id: args.unit,
        position_id: args.position,
        min_salary: args.min_salary,
        max_salary: args.max_salary,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for listing in &report.rows {
        println!(
            "{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
            listing.contract.contract_id,
            listing.person_name,
            listing.position_code,
            listing.unit_name,
            listing.contract.terms.salary_millions,
            listing.contract.terms.cap_hit_millions
        );
    }
    match &report.stats {
        Some(stats) => println!(
            "count={} avg_salary={:.2} avg_cap_hit={:.2} total_cap_hit={:.2}",
            stats.count, stats.avg_salary, stats.avg_cap_hit, stats.total_cap_hit
        ),
        None => println!("no data"),
    }
    Ok(())
}

/// Explicit `--years` is passed through so the core can reject a mismatch.
fn to_terms(args: &TermsArgs) -> ContractTerms {
    let mut terms = ContractTerms::new(args.start, args.end, args.salary, args.cap_hit);
    if let Some(years) = args.years {
        terms.years = years;
    }
    terms
}

fn print_cascade(entity: &str, id: i64, summary: &CascadeSummary) {
    println!(
        "deleted {entity} {id} contracts_removed={} people_removed={} positions_removed={}",
        summary.contracts_removed,
        summary.people_removed.len(),
        summary.positions_removed
    );
}
