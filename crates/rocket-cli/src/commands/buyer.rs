// crates/rocket-cli/src/commands/buyer.rs
//
// Buyer-side commands: approve, quote, deposit, harvest.

use clap::Args;
use serde_json::json;

use rocket_core::{format_units, Amount};

use super::parse_amount;
use crate::error::CliError;
use crate::output::{format_json, format_timestamp, OutputFormat};
use crate::state::Sandbox;

#[derive(Debug, Args)]
pub struct ApproveArgs {
    /// Account granting the allowance (name or address).
    #[arg(long)]
    pub from: String,
    /// Asset (symbol or address).
    #[arg(long)]
    pub asset: String,
    /// Allowance in whole tokens, or `max` for unlimited.
    #[arg(long, default_value = "max")]
    pub amount: String,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Market currency (symbol or address).
    #[arg(long)]
    pub market: String,
    /// Principal amount in whole tokens.
    #[arg(long)]
    pub amount: String,
}

#[derive(Debug, Args)]
pub struct DepositArgs {
    /// Buyer account (name or address).
    #[arg(long)]
    pub from: String,
    /// Market currency (symbol or address).
    #[arg(long)]
    pub market: String,
    /// Principal amount in whole tokens.
    #[arg(long)]
    pub amount: String,
    /// Highest acceptable price in market tokens, or `max`.
    #[arg(long)]
    pub max_price: String,
}

#[derive(Debug, Args)]
pub struct HarvestArgs {
    /// Buyer account (name or address).
    #[arg(long)]
    pub from: String,
}

pub async fn approve(sandbox: &Sandbox, args: &ApproveArgs, format: OutputFormat) -> Result<(), CliError> {
    let owner = sandbox.config.party(&args.from)?;
    let asset = sandbox.config.asset(&args.asset)?;
    let amount = parse_amount(&args.amount)?;
    sandbox.assets.approve(&asset.address, &owner, amount)?;
    sandbox.save().await?;

    let shown = if amount == Amount::MAX {
        "unlimited".to_string()
    } else {
        format_units(amount)
    };
    match format {
        OutputFormat::Json => println!(
            "{}",
            format_json(&json!({ "owner": owner, "asset": asset.address, "allowance": amount }))
        ),
        OutputFormat::Table => println!(
            "{} approved the desk for {} {}",
            sandbox.config.label(&owner),
            shown,
            asset.symbol
        ),
    }
    Ok(())
}

pub async fn quote(sandbox: &Sandbox, args: &QuoteArgs, format: OutputFormat) -> Result<(), CliError> {
    let market = sandbox.config.asset(&args.market)?;
    let amount = parse_amount(&args.amount)?;
    let quote = sandbox
        .desk
        .with_desk(|desk| desk.quote_details(&market.address, amount))
        .await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&quote)),
        OutputFormat::Table => {
            println!(
                "{} {} costs {} {}",
                format_units(amount),
                sandbox.config.principal,
                format_units(quote.price),
                market.symbol
            );
            println!(
                "  Discount: {}/{}",
                quote.discount.numerator, quote.discount.denominator
            );
        }
    }
    Ok(())
}

pub async fn deposit(sandbox: &Sandbox, args: &DepositArgs, format: OutputFormat) -> Result<(), CliError> {
    let buyer = sandbox.config.party(&args.from)?;
    let market = sandbox.config.asset(&args.market)?;
    let amount = parse_amount(&args.amount)?;
    let max_price = parse_amount(&args.max_price)?;

    let receipt = sandbox
        .desk
        .deposit(&buyer, &market.address, amount, max_price)
        .await?;
    sandbox.save().await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&receipt)),
        OutputFormat::Table => {
            println!(
                "{} bought {} {} for {} {}",
                sandbox.config.label(&buyer),
                format_units(amount),
                sandbox.config.principal,
                format_units(receipt.price),
                market.symbol
            );
            println!("  Matures at: {}", format_timestamp(receipt.matures_at));
        }
    }
    Ok(())
}

pub async fn harvest(sandbox: &Sandbox, args: &HarvestArgs, format: OutputFormat) -> Result<(), CliError> {
    let buyer = sandbox.config.party(&args.from)?;
    let released = sandbox.desk.harvest(&buyer).await?;
    sandbox.save().await?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            format_json(&json!({ "buyer": buyer, "released": released }))
        ),
        OutputFormat::Table => println!(
            "{} harvested {} {}",
            sandbox.config.label(&buyer),
            format_units(released),
            sandbox.config.principal
        ),
    }
    Ok(())
}
