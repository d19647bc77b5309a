// crates/rocket-ledger/src/sandbox.rs
//
// Deterministic in-memory collaborators.
//
// Used by the test suites and by the CLI sandbox:
//   - InMemoryAssets: multi-token balances with ERC-20 style allowances
//   - FixedPriceOracle: fixed per-asset unit prices in one reference currency
//   - FlatDiscountCurve: the same multiplier for every request
//   - ManualClock: a clock that only moves when told to

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use rocket_core::{
    mul_div, Address, Amount, AssetId, AssetTransfer, Clock, Discount, DiscountCurve,
    PriceOracle, RocketError, Timestamp, DEFAULT_REFERENCE_CURRENCY, UNIT,
};

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// A holder's balance of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub asset: AssetId,
    pub owner: Address,
    pub amount: Amount,
}

/// Allowance an owner granted to the custody address for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub asset: AssetId,
    pub owner: Address,
    pub amount: Amount,
}

/// Serialisable state of an [`InMemoryAssets`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsSnapshot {
    pub custody: Address,
    pub balances: Vec<BalanceEntry>,
    pub allowances: Vec<AllowanceEntry>,
}

#[derive(Debug, Default)]
struct AssetsState {
    balances: HashMap<(AssetId, Address), Amount>,
    /// Allowances granted to custody, keyed by (asset, owner).
    allowances: HashMap<(AssetId, Address), Amount>,
}

/// In-memory token balances for any number of assets.
///
/// Pulling from a party other than custody consumes allowance that party
/// granted with [`InMemoryAssets::approve`]. An allowance of `Amount::MAX`
/// is treated as unlimited and never decremented.
#[derive(Debug)]
pub struct InMemoryAssets {
    custody: Address,
    state: RwLock<AssetsState>,
}

impl InMemoryAssets {
    /// Create an empty asset registry whose desk custody is `custody`.
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            state: RwLock::new(AssetsState::default()),
        }
    }

    /// Rebuild from a snapshot.
    pub fn from_snapshot(snapshot: AssetsSnapshot) -> Self {
        let mut state = AssetsState::default();
        for entry in snapshot.balances {
            state.balances.insert((entry.asset, entry.owner), entry.amount);
        }
        for entry in snapshot.allowances {
            state.allowances.insert((entry.asset, entry.owner), entry.amount);
        }
        Self {
            custody: snapshot.custody,
            state: RwLock::new(state),
        }
    }

    /// Capture balances and allowances, skipping zero entries.
    pub fn snapshot(&self) -> Result<AssetsSnapshot, RocketError> {
        let state = self.read()?;
        let mut balances: Vec<BalanceEntry> = state
            .balances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|((asset, owner), amount)| BalanceEntry {
                asset: *asset,
                owner: *owner,
                amount: *amount,
            })
            .collect();
        balances.sort_by_key(|e| (e.asset, e.owner));
        let mut allowances: Vec<AllowanceEntry> = state
            .allowances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|((asset, owner), amount)| AllowanceEntry {
                asset: *asset,
                owner: *owner,
                amount: *amount,
            })
            .collect();
        allowances.sort_by_key(|e| (e.asset, e.owner));
        Ok(AssetsSnapshot {
            custody: self.custody,
            balances,
            allowances,
        })
    }

    /// Credit `amount` of `asset` to `to` out of thin air.
    pub fn mint(&self, asset: &AssetId, to: &Address, amount: Amount) -> Result<(), RocketError> {
        let mut state = self.write()?;
        let balance = state.balances.entry((*asset, *to)).or_insert(Amount::ZERO);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| RocketError::Overflow(format!("minting {} to {}", asset, to)))?;
        Ok(())
    }

    /// Set the allowance `owner` grants custody over `asset`.
    pub fn approve(&self, asset: &AssetId, owner: &Address, amount: Amount) -> Result<(), RocketError> {
        self.write()?.allowances.insert((*asset, *owner), amount);
        Ok(())
    }

    pub fn balance_of(&self, asset: &AssetId, owner: &Address) -> Result<Amount, RocketError> {
        Ok(self
            .read()?
            .balances
            .get(&(*asset, *owner))
            .copied()
            .unwrap_or(Amount::ZERO))
    }

    pub fn allowance(&self, asset: &AssetId, owner: &Address) -> Result<Amount, RocketError> {
        Ok(self
            .read()?
            .allowances
            .get(&(*asset, *owner))
            .copied()
            .unwrap_or(Amount::ZERO))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, AssetsState>, RocketError> {
        self.state
            .read()
            .map_err(|e| RocketError::Storage(format!("RwLock poisoned: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AssetsState>, RocketError> {
        self.state
            .write()
            .map_err(|e| RocketError::Storage(format!("RwLock poisoned: {}", e)))
    }
}

impl AssetTransfer for InMemoryAssets {
    fn custody(&self) -> Address {
        self.custody
    }

    fn transfer(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), RocketError> {
        let mut state = self.write()?;

        // Validate everything before touching any entry.
        let allowance = if *from != self.custody {
            let allowance = state
                .allowances
                .get(&(*asset, *from))
                .copied()
                .unwrap_or(Amount::ZERO);
            if allowance < amount {
                return Err(RocketError::TransferFailed(format!(
                    "insufficient allowance: {} granted {} of {}, needs {}",
                    from, allowance, asset, amount
                )));
            }
            Some(allowance)
        } else {
            None
        };

        let from_balance = state
            .balances
            .get(&(*asset, *from))
            .copied()
            .unwrap_or(Amount::ZERO);
        if from_balance < amount {
            return Err(RocketError::TransferFailed(format!(
                "insufficient balance: {} holds {} of {}, needs {}",
                from, from_balance, asset, amount
            )));
        }

        if from == to {
            return Ok(());
        }

        let to_balance = state
            .balances
            .get(&(*asset, *to))
            .copied()
            .unwrap_or(Amount::ZERO);
        let to_balance = to_balance.checked_add(amount).ok_or_else(|| {
            RocketError::TransferFailed(format!("balance of {} in {} would overflow", to, asset))
        })?;

        if let Some(allowance) = allowance {
            if allowance != Amount::MAX {
                state.allowances.insert((*asset, *from), allowance - amount);
            }
        }
        state.balances.insert((*asset, *from), from_balance - amount);
        state.balances.insert((*asset, *to), to_balance);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

/// Prices every asset at a fixed value per whole token.
#[derive(Debug)]
pub struct FixedPriceOracle {
    currency: String,
    prices: RwLock<HashMap<AssetId, Amount>>,
}

impl FixedPriceOracle {
    /// An oracle quoting in the default reference currency with no prices set.
    pub fn new() -> Self {
        Self::with_currency(DEFAULT_REFERENCE_CURRENCY)
    }

    pub fn with_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            prices: RwLock::new(HashMap::new()),
        }
    }

    /// Builder form of [`FixedPriceOracle::set_price`].
    pub fn with_price(self, asset: AssetId, unit_price: Amount) -> Self {
        if let Ok(mut prices) = self.prices.write() {
            prices.insert(asset, unit_price);
        }
        self
    }

    /// Set the value of one whole token of `asset`, in currency base units.
    pub fn set_price(&self, asset: AssetId, unit_price: Amount) -> Result<(), RocketError> {
        self.prices
            .write()
            .map_err(|e| RocketError::Storage(format!("RwLock poisoned: {}", e)))?
            .insert(asset, unit_price);
        Ok(())
    }
}

impl Default for FixedPriceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceOracle for FixedPriceOracle {
    fn price_in_currency(
        &self,
        currency: &str,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<Amount, RocketError> {
        if currency != self.currency {
            return Err(RocketError::Oracle(format!(
                "no prices in {} (oracle quotes {})",
                currency, self.currency
            )));
        }
        let unit_price = self
            .prices
            .read()
            .map_err(|e| RocketError::Storage(format!("RwLock poisoned: {}", e)))?
            .get(asset)
            .copied()
            .ok_or_else(|| RocketError::Oracle(format!("no price for asset {}", asset)))?;
        mul_div(unit_price, amount, UNIT)
    }
}

// ---------------------------------------------------------------------------
// Discount curve
// ---------------------------------------------------------------------------

/// Returns the same multiplier for any asset, amount, and duration.
#[derive(Debug, Clone, Copy)]
pub struct FlatDiscountCurve {
    discount: Discount,
}

impl FlatDiscountCurve {
    pub fn new(discount: Discount) -> Self {
        Self { discount }
    }
}

impl DiscountCurve for FlatDiscountCurve {
    fn discount(
        &self,
        _asset: &AssetId,
        _amount: Amount,
        _duration_secs: u64,
    ) -> Result<Discount, RocketError> {
        Ok(self.discount)
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// A clock that stands still until set or advanced.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move the clock forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let next = self.now().saturating_add(secs);
        self.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
