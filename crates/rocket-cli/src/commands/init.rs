// crates/rocket-cli/src/commands/init.rs
//
// `rocket init`: create sandbox state from the configuration.

use std::path::PathBuf;

use serde_json::json;

use rocket_core::Clock;

use crate::config::SandboxConfig;
use crate::error::CliError;
use crate::output::{format_json, format_timestamp, OutputFormat};
use crate::state::Sandbox;

/// Run the init subcommand.
pub async fn run(
    config: SandboxConfig,
    state_path: PathBuf,
    force: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    let sandbox = Sandbox::init(config, state_path, force)?;
    sandbox.save().await?;

    let now = sandbox.clock.now();
    match format {
        OutputFormat::Json => println!(
            "{}",
            format_json(&json!({
                "state": sandbox.path().display().to_string(),
                "now": now,
                "accounts": sandbox.config.accounts.len(),
            }))
        ),
        OutputFormat::Table => {
            println!("Sandbox initialized at {}", sandbox.path().display());
            println!("  Clock:     {}", format_timestamp(now));
            println!("  Principal: {}", sandbox.config.principal);
            println!("  Lock:      {} days", sandbox.config.lock_duration_days);
            println!(
                "  Discount:  {}/{}",
                sandbox.config.discount.numerator, sandbox.config.discount.denominator
            );
            for account in &sandbox.config.accounts {
                println!("  Account:   {} ({})", account.name, account.address);
            }
        }
    }
    Ok(())
}
