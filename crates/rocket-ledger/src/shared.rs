// crates/rocket-ledger/src/shared.rs
//
// SharedBondDesk: a desk behind one async lock.
//
// Each method holds the lock for the whole operation, so operations on the
// same desk never interleave. Clones share the same desk.

use std::sync::Arc;

use tokio::sync::Mutex;

use rocket_core::{Address, Amount, AssetId, RocketError};

use crate::allocation::Market;
use crate::desk::{BondDesk, DepositReceipt};
use crate::orders::Order;
use crate::snapshot::LedgerSnapshot;

/// Thread-safe handle to a [`BondDesk`].
#[derive(Clone)]
pub struct SharedBondDesk {
    inner: Arc<Mutex<BondDesk>>,
}

impl SharedBondDesk {
    pub fn new(desk: BondDesk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(desk)),
        }
    }

    pub async fn allocate(
        &self,
        operator: &Address,
        market: &AssetId,
        amount: Amount,
    ) -> Result<Market, RocketError> {
        self.inner.lock().await.allocate(operator, market, amount)
    }

    pub async fn deallocate(
        &self,
        operator: &Address,
        market: &AssetId,
        amount: Amount,
    ) -> Result<Market, RocketError> {
        self.inner.lock().await.deallocate(operator, market, amount)
    }

    pub async fn quote(&self, market: &AssetId, principal_amount: Amount) -> Result<Amount, RocketError> {
        self.inner.lock().await.quote(market, principal_amount)
    }

    pub async fn deposit(
        &self,
        buyer: &Address,
        market: &AssetId,
        principal_amount: Amount,
        max_price: Amount,
    ) -> Result<DepositReceipt, RocketError> {
        self.inner
            .lock()
            .await
            .deposit(buyer, market, principal_amount, max_price)
    }

    pub async fn harvest(&self, buyer: &Address) -> Result<Amount, RocketError> {
        self.inner.lock().await.harvest(buyer)
    }

    pub async fn market(&self, market: &AssetId) -> Market {
        self.inner.lock().await.market(market)
    }

    pub async fn pending_order(&self, buyer: &Address) -> Option<Order> {
        self.inner.lock().await.pending_order(buyer)
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Run `f` with exclusive access to the desk.
    pub async fn with_desk<R>(&self, f: impl FnOnce(&mut BondDesk) -> R) -> R {
        let mut desk = self.inner.lock().await;
        f(&mut desk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::{Collaborators, DeskConfig};
    use crate::sandbox::{FixedPriceOracle, FlatDiscountCurve, InMemoryAssets, ManualClock};
    use rocket_core::{units, Discount, UNIT};

    fn busd() -> AssetId {
        AssetId::repeat_byte(0xb0)
    }

    fn voodoo() -> AssetId {
        AssetId::repeat_byte(0x70)
    }

    fn operator() -> Address {
        Address::repeat_byte(0x0a)
    }

    /// Desk with 10 VOO allocated to the BUSD market and 20 funded buyers.
    async fn shared_desk() -> (SharedBondDesk, Vec<Address>) {
        let assets = Arc::new(InMemoryAssets::new(Address::repeat_byte(0xcc)));
        assets.mint(&voodoo(), &operator(), units(10)).unwrap();
        assets.approve(&voodoo(), &operator(), Amount::MAX).unwrap();
        let buyers: Vec<Address> = (0x21..=0x34u8).map(Address::repeat_byte).collect();
        for b in &buyers {
            assets.mint(&busd(), b, units(10)).unwrap();
            assets.approve(&busd(), b, Amount::MAX).unwrap();
        }
        let desk = BondDesk::new(
            DeskConfig::new(voodoo(), Address::repeat_byte(0x7e)),
            Collaborators {
                transfer: assets,
                oracle: Arc::new(
                    FixedPriceOracle::new()
                        .with_price(voodoo(), UNIT)
                        .with_price(busd(), UNIT),
                ),
                curve: Arc::new(FlatDiscountCurve::new(Discount::new(9, 10))),
                clock: Arc::new(ManualClock::new(1_700_000_000)),
            },
        );
        let shared = SharedBondDesk::new(desk);
        shared.allocate(&operator(), &busd(), units(10)).await.unwrap();
        (shared, buyers)
    }

    #[tokio::test]
    async fn test_concurrent_deposits_never_oversell() {
        let (shared, buyers) = shared_desk().await;

        let mut handles = Vec::new();
        for buyer in buyers {
            let desk = shared.clone();
            handles.push(tokio::spawn(async move {
                desk.deposit(&buyer, &busd(), UNIT, Amount::MAX).await
            }));
        }

        let mut filled = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => filled += 1,
                Err(RocketError::InsufficientAllocation { .. }) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(filled, 10);
        let market = shared.market(&busd()).await;
        assert_eq!(market.available, Amount::ZERO);
        assert_eq!(market.allocated, units(10));
        assert_eq!(shared.snapshot().await.orders.len(), 10);
    }

    #[tokio::test]
    async fn test_with_desk_gives_exclusive_access() {
        let (shared, buyers) = shared_desk().await;
        let buyer = buyers[0];
        let receipt = shared
            .with_desk(|desk| desk.deposit(&buyer, &busd(), UNIT, Amount::MAX))
            .await
            .unwrap();
        assert_eq!(shared.pending_order(&buyer).await.unwrap().matures_at, receipt.matures_at);
        assert_eq!(shared.quote(&busd(), UNIT).await.unwrap(), receipt.price);
    }
}
