// crates/rocket-cli/src/commands/clock.rs
//
// `rocket advance`: move the sandbox clock so orders can mature.

use clap::Args;
use serde_json::json;

use rocket_core::{Clock, SECONDS_PER_DAY};

use crate::error::CliError;
use crate::output::{format_json, format_timestamp, OutputFormat};
use crate::state::Sandbox;

#[derive(Debug, Args)]
pub struct AdvanceArgs {
    /// Whole days to advance.
    #[arg(long, default_value_t = 0)]
    pub days: u64,
    /// Additional seconds to advance.
    #[arg(long, default_value_t = 0)]
    pub seconds: u64,
}

impl AdvanceArgs {
    fn total_secs(&self) -> u64 {
        self.days
            .saturating_mul(SECONDS_PER_DAY)
            .saturating_add(self.seconds)
    }
}

pub async fn advance(sandbox: &Sandbox, args: &AdvanceArgs, format: OutputFormat) -> Result<(), CliError> {
    let before = sandbox.clock.now();
    let now = sandbox.clock.advance(args.total_secs());
    sandbox.save().await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&json!({ "from": before, "now": now }))),
        OutputFormat::Table => println!(
            "Clock advanced {}s: {} -> {}",
            now - before,
            format_timestamp(before),
            format_timestamp(now)
        ),
    }
    Ok(())
}
