// crates/rocket-core/src/traits.rs

use crate::error::RocketError;
use crate::types::{Address, Amount, AssetId, Discount, Timestamp};

/// Trait for moving fungible assets between parties.
///
/// Implementations must be atomic: a failed transfer leaves every balance
/// untouched. Pulling from a party relies on an allowance that party granted
/// to `custody()` beforehand.
///
/// Implemented by rocket-ledger's `InMemoryAssets` sandbox.
pub trait AssetTransfer: Send + Sync {
    /// The address that holds assets on behalf of the desk.
    fn custody(&self) -> Address;

    /// Move `amount` of `asset` from `from` to `to`.
    fn transfer(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), RocketError>;

    /// Pull `amount` of `asset` from `from` into custody.
    fn transfer_in(&self, asset: &AssetId, from: &Address, amount: Amount) -> Result<(), RocketError> {
        let custody = self.custody();
        self.transfer(asset, from, &custody, amount)
    }

    /// Push `amount` of `asset` out of custody to `to`.
    fn transfer_out(&self, asset: &AssetId, to: &Address, amount: Amount) -> Result<(), RocketError> {
        let custody = self.custody();
        self.transfer(asset, &custody, to, amount)
    }
}

/// Trait for valuing an asset amount in a reference currency.
///
/// Trusted input: the desk performs no staleness checks.
pub trait PriceOracle: Send + Sync {
    /// Value of `amount` of `asset`, expressed in `currency` base units.
    fn price_in_currency(
        &self,
        currency: &str,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<Amount, RocketError>;
}

/// Trait for the discount applied to a purchase locked for `duration_secs`.
pub trait DiscountCurve: Send + Sync {
    fn discount(
        &self,
        asset: &AssetId,
        amount: Amount,
        duration_secs: u64,
    ) -> Result<Discount, RocketError>;
}

/// Source of the current time. Read once per desk operation.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Pre-epoch clocks clamp to zero.
        chrono::Utc::now().timestamp().max(0) as Timestamp
    }
}
