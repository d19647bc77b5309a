// crates/rocket-cli/src/main.rs
//
// CLI entrypoint for the Rocket bond desk sandbox.
//
// Drives a desk backed by in-memory collaborators whose state is persisted
// to a JSON file between invocations: allocate principal as the operator,
// quote and deposit as a buyer, advance the sandbox clock, harvest.

mod commands;
mod config;
mod error;
mod output;
mod state;

use clap::{Parser, Subcommand};

use commands::buyer::{ApproveArgs, DepositArgs, HarvestArgs, QuoteArgs};
use commands::clock::AdvanceArgs;
use commands::operator::AllocationArgs;
use config::{default_home, expand_tilde, SandboxConfig};
use error::CliError;
use output::OutputFormat;
use state::Sandbox;

/// Rocket CLI: discounted bond desk sandbox.
#[derive(Parser, Debug)]
#[command(
    name = "rocket",
    version = "0.1.0",
    about = "Rocket bond desk sandbox: allocate principal, sell it at a discount, release it after the lock"
)]
struct Cli {
    /// Path to the TOML configuration file (default: ~/.rocket/config.toml).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Path to the JSON state file (overrides `state_file` in the config).
    #[arg(long, global = true)]
    state: Option<String>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Create sandbox state and mint the configured balances.
    Init {
        /// Overwrite existing state.
        #[arg(long)]
        force: bool,
    },

    /// Grant the desk an allowance over an account's tokens.
    Approve(ApproveArgs),

    /// Reserve principal for sale in a market (operator).
    Allocate(AllocationArgs),

    /// Withdraw unsold principal from a market (operator).
    Deallocate(AllocationArgs),

    /// Price an amount of principal in a market.
    Quote(QuoteArgs),

    /// Buy principal at the current quote, bounded by a max price.
    Deposit(DepositArgs),

    /// Release the principal of a matured order.
    Harvest(HarvestArgs),

    /// Move the sandbox clock forward.
    Advance(AdvanceArgs),

    /// Show markets and pending orders.
    Status,

    /// Show token balances.
    Balances,

    /// Show the desk's event journal.
    History,
}

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .config
        .as_deref()
        .map(expand_tilde)
        .unwrap_or_else(|| default_home().join("config.toml"));
    let config = SandboxConfig::load_or_default(&config_path)?;
    let state_path = config.state_path(cli.state.as_deref());
    let format = OutputFormat::from_flag(cli.json);

    let open = || Sandbox::open(config.clone(), state_path.clone());
    match &cli.command {
        Commands::Init { force } => {
            commands::init::run(config.clone(), state_path.clone(), *force, format).await?
        }
        Commands::Approve(args) => commands::buyer::approve(&open()?, args, format).await?,
        Commands::Allocate(args) => commands::operator::allocate(&open()?, args, format).await?,
        Commands::Deallocate(args) => {
            commands::operator::deallocate(&open()?, args, format).await?
        }
        Commands::Quote(args) => commands::buyer::quote(&open()?, args, format).await?,
        Commands::Deposit(args) => commands::buyer::deposit(&open()?, args, format).await?,
        Commands::Harvest(args) => commands::buyer::harvest(&open()?, args, format).await?,
        Commands::Advance(args) => commands::clock::advance(&open()?, args, format).await?,
        Commands::Status => commands::status::status(&open()?, format).await?,
        Commands::Balances => commands::status::balances(&open()?, format)?,
        Commands::History => commands::status::history(&open()?, format).await?,
    }

    Ok(())
}
