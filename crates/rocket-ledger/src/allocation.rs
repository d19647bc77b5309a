// crates/rocket-ledger/src/allocation.rs
//
// Per-market bookkeeping of principal reserved for sale.
//
// Each market tracks two numbers:
//   - allocated: gross principal the operator has committed to the market
//   - available: principal still reserved for sale (not yet sold to a buyer)
//
// Invariant: available <= allocated. `allocate`/`deallocate` move both by the
// same delta; a deposit commits principal to a buyer and only lowers
// `available`.
//
// Updates are staged: `prepare_*` validates and returns the updated record
// without touching the ledger, and `apply` stores it once the matching asset
// transfer has succeeded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rocket_core::{Amount, AssetId, RocketError};

/// Allocation state of a single market (one quote currency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Quote-currency token address identifying the market.
    pub asset: AssetId,
    /// Gross principal committed to this market by the operator.
    pub allocated: Amount,
    /// Principal still reserved for sale.
    pub available: Amount,
}

impl Market {
    /// An untouched market with nothing allocated.
    pub fn empty(asset: AssetId) -> Self {
        Self {
            asset,
            allocated: Amount::ZERO,
            available: Amount::ZERO,
        }
    }

    /// Principal sold to buyers and not returned: `allocated - available`.
    pub fn committed(&self) -> Amount {
        self.allocated.saturating_sub(self.available)
    }

    fn ensure_available(&self, requested: Amount) -> Result<(), RocketError> {
        if requested > self.available {
            return Err(RocketError::InsufficientAllocation {
                market: self.asset,
                requested,
                available: self.available,
            });
        }
        Ok(())
    }
}

/// Ledger of every market's allocation.
#[derive(Debug, Clone, Default)]
pub struct AllocationLedger {
    markets: HashMap<AssetId, Market>,
}

impl AllocationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored market records.
    ///
    /// # Errors
    /// Returns `RocketError::Storage` if a record breaks `available <= allocated`
    /// or a market appears twice.
    pub fn from_markets(markets: Vec<Market>) -> Result<Self, RocketError> {
        let mut ledger = Self::new();
        for market in markets {
            if market.available > market.allocated {
                return Err(RocketError::Storage(format!(
                    "market {} has available {} above allocated {}",
                    market.asset, market.available, market.allocated
                )));
            }
            if ledger.markets.insert(market.asset, market).is_some() {
                return Err(RocketError::Storage(format!(
                    "market {} appears twice",
                    market.asset
                )));
            }
        }
        Ok(ledger)
    }

    /// Current record for `asset`; unknown markets read as empty.
    pub fn market(&self, asset: &AssetId) -> Market {
        self.markets
            .get(asset)
            .copied()
            .unwrap_or_else(|| Market::empty(*asset))
    }

    /// All markets that have ever been allocated to, ordered by address.
    pub fn markets(&self) -> Vec<Market> {
        let mut markets: Vec<Market> = self.markets.values().copied().collect();
        markets.sort_by_key(|m| m.asset);
        markets
    }

    /// Principal currently reserved for sale in `asset`.
    pub fn available_of(&self, asset: &AssetId) -> Amount {
        self.market(asset).available
    }

    /// Gross principal committed to `asset`.
    pub fn allocated_of(&self, asset: &AssetId) -> Amount {
        self.market(asset).allocated
    }

    /// Stage an allocation: both totals grow by `amount`.
    ///
    /// # Errors
    /// `InvalidAmount` for zero, `Overflow` if a total would not fit.
    pub fn prepare_allocate(&self, asset: &AssetId, amount: Amount) -> Result<Market, RocketError> {
        if amount.is_zero() {
            return Err(RocketError::InvalidAmount(
                "allocation must be greater than zero".to_string(),
            ));
        }
        let mut market = self.market(asset);
        let overflow = || RocketError::Overflow(format!("allocation to market {}", asset));
        market.allocated = market.allocated.checked_add(amount).ok_or_else(overflow)?;
        market.available = market.available.checked_add(amount).ok_or_else(overflow)?;
        Ok(market)
    }

    /// Stage a deallocation: both totals shrink by `amount`.
    ///
    /// Only unsold principal can be withdrawn.
    ///
    /// # Errors
    /// `InvalidAmount` for zero, `InsufficientAllocation` above `available`.
    pub fn prepare_deallocate(&self, asset: &AssetId, amount: Amount) -> Result<Market, RocketError> {
        if amount.is_zero() {
            return Err(RocketError::InvalidAmount(
                "deallocation must be greater than zero".to_string(),
            ));
        }
        let mut market = self.market(asset);
        market.ensure_available(amount)?;
        market.allocated -= amount;
        market.available -= amount;
        Ok(market)
    }

    /// Stage a sale: `available` shrinks by `amount`, `allocated` is unchanged.
    ///
    /// # Errors
    /// `InsufficientAllocation` above `available`.
    pub fn prepare_commit(&self, asset: &AssetId, amount: Amount) -> Result<Market, RocketError> {
        let mut market = self.market(asset);
        market.ensure_available(amount)?;
        market.available -= amount;
        Ok(market)
    }

    /// Store a record produced by one of the `prepare_*` methods.
    pub fn apply(&mut self, market: Market) {
        debug_assert!(market.available <= market.allocated);
        self.markets.insert(market.asset, market);
    }
}
