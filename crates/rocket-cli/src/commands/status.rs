// crates/rocket-cli/src/commands/status.rs
//
// Read-only views: `rocket status`, `rocket balances`, `rocket history`.

use serde_json::json;
use tabled::Tabled;

use rocket_core::{format_units, Clock};

use crate::error::CliError;
use crate::output::{emit, format_timestamp, OutputFormat};
use crate::state::Sandbox;

#[derive(Tabled)]
struct MarketRow {
    market: String,
    allocated: String,
    available: String,
    sold: String,
}

#[derive(Tabled)]
struct OrderRow {
    buyer: String,
    market: String,
    principal: String,
    paid: String,
    matures_at: String,
    state: &'static str,
}

#[derive(Tabled)]
struct BalanceRow {
    owner: String,
    asset: String,
    balance: String,
}

#[derive(Tabled)]
struct EventRow {
    at: String,
    kind: &'static str,
    detail: String,
}

pub async fn status(sandbox: &Sandbox, format: OutputFormat) -> Result<(), CliError> {
    let now = sandbox.clock.now();
    let snapshot = sandbox.desk.snapshot().await;
    let config = &sandbox.config;

    let market_rows: Vec<MarketRow> = snapshot
        .markets
        .iter()
        .map(|m| MarketRow {
            market: config.label(&m.asset),
            allocated: format_units(m.allocated),
            available: format_units(m.available),
            sold: format_units(m.committed()),
        })
        .collect();
    let order_rows: Vec<OrderRow> = snapshot
        .orders
        .iter()
        .map(|o| OrderRow {
            buyer: config.label(&o.buyer),
            market: config.label(&o.market),
            principal: format_units(o.principal_amount),
            paid: format_units(o.price_paid),
            matures_at: format_timestamp(o.matures_at),
            state: if o.is_matured(now) { "matured" } else { "locked" },
        })
        .collect();

    match format {
        OutputFormat::Json => emit(
            format,
            &market_rows,
            &json!({
                "now": now,
                "markets": snapshot.markets,
                "orders": snapshot.orders,
            }),
        ),
        OutputFormat::Table => {
            println!("Clock: {}", format_timestamp(now));
            println!();
            println!("Markets");
            emit(format, &market_rows, &());
            println!();
            println!("Pending orders");
            emit(format, &order_rows, &());
        }
    }
    Ok(())
}

pub fn balances(sandbox: &Sandbox, format: OutputFormat) -> Result<(), CliError> {
    let snapshot = sandbox.assets.snapshot()?;
    let rows: Vec<BalanceRow> = snapshot
        .balances
        .iter()
        .map(|b| BalanceRow {
            owner: sandbox.config.label(&b.owner),
            asset: sandbox.config.label(&b.asset),
            balance: format_units(b.amount),
        })
        .collect();
    emit(format, &rows, &snapshot);
    Ok(())
}

pub async fn history(sandbox: &Sandbox, format: OutputFormat) -> Result<(), CliError> {
    let events = sandbox.desk.snapshot().await.events;
    let rows: Vec<EventRow> = events
        .iter()
        .map(|e| EventRow {
            at: format_timestamp(e.at()),
            kind: e.kind(),
            detail: e.to_string(),
        })
        .collect();
    emit(format, &rows, &events);
    Ok(())
}
