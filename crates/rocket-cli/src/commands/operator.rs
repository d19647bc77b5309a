// crates/rocket-cli/src/commands/operator.rs
//
// `rocket allocate` / `rocket deallocate`: operator management of a
// market's principal reserve.

use clap::Args;

use rocket_core::{format_units, Address, Amount, AssetId};
use rocket_ledger::Market;

use super::parse_amount;
use crate::error::CliError;
use crate::output::{format_json, OutputFormat};
use crate::state::Sandbox;

/// Arguments shared by allocate and deallocate.
#[derive(Debug, Args)]
pub struct AllocationArgs {
    /// Market currency (symbol or address).
    #[arg(long)]
    pub market: String,
    /// Principal amount in whole tokens, e.g. 100 or 2.5.
    #[arg(long)]
    pub amount: String,
    /// Operator account (defaults to the configured operator).
    #[arg(long)]
    pub from: Option<String>,
}

pub async fn allocate(
    sandbox: &Sandbox,
    args: &AllocationArgs,
    format: OutputFormat,
) -> Result<(), CliError> {
    let (operator, market, amount) = resolve(sandbox, args)?;
    let updated = sandbox.desk.allocate(&operator, &market, amount).await?;
    sandbox.save().await?;
    report(sandbox, "Allocated", &args.amount, &updated, format);
    Ok(())
}

pub async fn deallocate(
    sandbox: &Sandbox,
    args: &AllocationArgs,
    format: OutputFormat,
) -> Result<(), CliError> {
    let (operator, market, amount) = resolve(sandbox, args)?;
    let updated = sandbox.desk.deallocate(&operator, &market, amount).await?;
    sandbox.save().await?;
    report(sandbox, "Deallocated", &args.amount, &updated, format);
    Ok(())
}

fn resolve(
    sandbox: &Sandbox,
    args: &AllocationArgs,
) -> Result<(Address, AssetId, Amount), CliError> {
    let operator = match &args.from {
        Some(from) => sandbox.config.party(from)?,
        None => sandbox.config.operator,
    };
    let market = sandbox.config.asset(&args.market)?.address;
    Ok((operator, market, parse_amount(&args.amount)?))
}

fn report(sandbox: &Sandbox, verb: &str, amount: &str, market: &Market, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", format_json(market)),
        OutputFormat::Table => {
            println!(
                "{} {} {} in market {}",
                verb,
                amount,
                sandbox.config.principal,
                sandbox.config.label(&market.asset)
            );
            println!("  Allocated: {}", format_units(market.allocated));
            println!("  Available: {}", format_units(market.available));
        }
    }
}
