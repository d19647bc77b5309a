// crates/rocket-cli/src/state.rs
//
// Sandbox persistence: a desk plus its in-memory collaborators, saved to a
// JSON state file between CLI invocations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rocket_core::{parse_units, Clock, SystemClock, Timestamp};
use rocket_ledger::{
    AssetsSnapshot, BondDesk, Collaborators, FixedPriceOracle, FlatDiscountCurve,
    InMemoryAssets, LedgerSnapshot, ManualClock, SharedBondDesk,
};

use crate::config::SandboxConfig;
use crate::error::CliError;

/// Everything persisted between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxState {
    /// Sandbox clock reading.
    pub now: Timestamp,
    pub assets: AssetsSnapshot,
    pub ledger: LedgerSnapshot,
}

/// A live desk wired to sandbox collaborators.
pub struct Sandbox {
    pub config: SandboxConfig,
    pub desk: SharedBondDesk,
    pub assets: Arc<InMemoryAssets>,
    pub clock: Arc<ManualClock>,
    path: PathBuf,
}

impl Sandbox {
    /// Create fresh state: mint configured balances and start the clock at wall time.
    pub fn init(config: SandboxConfig, path: PathBuf, force: bool) -> Result<Self, CliError> {
        if path.exists() && !force {
            return Err(CliError::StateExists(path));
        }

        let assets = InMemoryAssets::new(config.custody);
        for account in &config.accounts {
            for (symbol, amount) in &account.balances {
                let asset = config.asset(symbol)?;
                assets.mint(&asset.address, &account.address, parse_units(amount)?)?;
            }
        }

        let state = SandboxState {
            now: SystemClock.now(),
            assets: assets.snapshot()?,
            ledger: LedgerSnapshot::default(),
        };
        tracing::info!(
            "Initialized sandbox with {} accounts at {}",
            config.accounts.len(),
            path.display()
        );
        Self::build(config, path, state)
    }

    /// Load existing state from `path`.
    pub fn open(config: SandboxConfig, path: PathBuf) -> Result<Self, CliError> {
        if !path.exists() {
            return Err(CliError::NoState(path));
        }
        let contents = fs::read_to_string(&path)?;
        let state: SandboxState = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded sandbox state from {}", path.display());
        Self::build(config, path, state)
    }

    fn build(config: SandboxConfig, path: PathBuf, state: SandboxState) -> Result<Self, CliError> {
        let mut oracle = FixedPriceOracle::with_currency(config.reference_currency.clone());
        for asset in &config.assets {
            oracle = oracle.with_price(asset.address, config.asset_price(asset)?);
        }

        let assets = Arc::new(InMemoryAssets::from_snapshot(state.assets));
        let clock = Arc::new(ManualClock::new(state.now));
        let collaborators = Collaborators {
            transfer: assets.clone(),
            oracle: Arc::new(oracle),
            curve: Arc::new(FlatDiscountCurve::new(config.discount())),
            clock: clock.clone(),
        };
        let desk = BondDesk::restore(config.desk_config()?, collaborators, state.ledger)?;

        Ok(Self {
            config,
            desk: SharedBondDesk::new(desk),
            assets,
            clock,
            path,
        })
    }

    /// Write the current state back to the state file.
    pub async fn save(&self) -> Result<(), CliError> {
        let state = SandboxState {
            now: self.clock.now(),
            assets: self.assets.snapshot()?,
            ledger: self.desk.snapshot().await,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&state)?)?;
        tracing::debug!("Saved sandbox state to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
