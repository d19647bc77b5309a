// crates/rocket-ledger/src/orders.rs
//
// Outstanding buyer claims and their maturity.
//
// A buyer holds at most one unsettled order at a time. Lifecycle:
//   NONE -> PENDING (place) -> SETTLED (settle, once now >= matures_at) -> NONE
// There is no cancellation path; a matured order stays claimable forever.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rocket_core::{Address, Amount, AssetId, RocketError, Timestamp};

/// A buyer's paid-for, not-yet-released claim on principal.
///
/// Immutable apart from `settled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub buyer: Address,
    /// Market the order was paid in.
    pub market: AssetId,
    /// Principal released to the buyer at harvest.
    pub principal_amount: Amount,
    /// Market units paid to the treasury.
    pub price_paid: Amount,
    /// Earliest timestamp at which the order can be harvested.
    pub matures_at: Timestamp,
    pub settled: bool,
}

impl Order {
    pub fn is_matured(&self, now: Timestamp) -> bool {
        now >= self.matures_at
    }
}

/// Index of pending orders keyed by buyer.
#[derive(Debug, Clone)]
pub struct OrderBook {
    pending: HashMap<Address, Order>,
    lock_duration_secs: u64,
}

impl OrderBook {
    pub fn new(lock_duration_secs: u64) -> Self {
        Self {
            pending: HashMap::new(),
            lock_duration_secs,
        }
    }

    /// Rebuild an order book from stored pending orders.
    ///
    /// # Errors
    /// Returns `RocketError::Storage` if an order is already settled or a
    /// buyer has more than one order.
    pub fn from_orders(lock_duration_secs: u64, orders: Vec<Order>) -> Result<Self, RocketError> {
        let mut book = Self::new(lock_duration_secs);
        for order in orders {
            if order.settled {
                return Err(RocketError::Storage(format!(
                    "settled order for {} stored as pending",
                    order.buyer
                )));
            }
            let buyer = order.buyer;
            if book.pending.insert(buyer, order).is_some() {
                return Err(RocketError::Storage(format!(
                    "buyer {} has more than one pending order",
                    buyer
                )));
            }
        }
        Ok(book)
    }

    /// Fail if `buyer` already holds an unsettled order.
    pub fn ensure_can_place(&self, buyer: &Address) -> Result<(), RocketError> {
        if self.pending.contains_key(buyer) {
            return Err(RocketError::OrderAlreadyPending { buyer: *buyer });
        }
        Ok(())
    }

    /// Record a new order maturing `lock_duration_secs` after `now`.
    ///
    /// # Errors
    /// `OrderAlreadyPending` if the buyer has an unsettled order,
    /// `Overflow` if the maturity timestamp does not fit.
    pub fn place(
        &mut self,
        buyer: &Address,
        market: &AssetId,
        principal_amount: Amount,
        price_paid: Amount,
        now: Timestamp,
    ) -> Result<Order, RocketError> {
        self.ensure_can_place(buyer)?;
        let matures_at = self.maturity_for(now)?;
        let order = Order {
            buyer: *buyer,
            market: *market,
            principal_amount,
            price_paid,
            matures_at,
            settled: false,
        };
        self.pending.insert(*buyer, order.clone());
        Ok(order)
    }

    /// Maturity timestamp for an order placed at `now`.
    pub fn maturity_for(&self, now: Timestamp) -> Result<Timestamp, RocketError> {
        now.checked_add(self.lock_duration_secs)
            .ok_or_else(|| RocketError::Overflow(format!("maturity for order placed at {}", now)))
    }

    /// The buyer's order, provided it can be settled at `now`.
    ///
    /// # Errors
    /// `NoOrder` if nothing is pending, `NotMatured` before `matures_at`.
    pub fn matured(&self, buyer: &Address, now: Timestamp) -> Result<&Order, RocketError> {
        let order = self
            .pending
            .get(buyer)
            .ok_or(RocketError::NoOrder { buyer: *buyer })?;
        if !order.is_matured(now) {
            return Err(RocketError::NotMatured {
                matures_at: order.matures_at,
                now,
            });
        }
        Ok(order)
    }

    /// Mark the buyer's matured order settled and remove it from the index.
    ///
    /// # Errors
    /// Same as [`OrderBook::matured`].
    pub fn settle(&mut self, buyer: &Address, now: Timestamp) -> Result<Order, RocketError> {
        self.matured(buyer, now)?;
        let mut order = self
            .pending
            .remove(buyer)
            .ok_or(RocketError::NoOrder { buyer: *buyer })?;
        order.settled = true;
        Ok(order)
    }

    /// The buyer's unsettled order, if any.
    pub fn pending(&self, buyer: &Address) -> Option<&Order> {
        self.pending.get(buyer)
    }

    /// All unsettled orders ordered by maturity, then buyer.
    pub fn orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.pending.values().cloned().collect();
        orders.sort_by_key(|o| (o.matures_at, o.buyer));
        orders
    }

    /// Total principal owed to buyers across all pending orders.
    pub fn outstanding_principal(&self) -> Amount {
        self.pending
            .values()
            .fold(Amount::ZERO, |acc, o| acc.saturating_add(o.principal_amount))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn lock_duration_secs(&self) -> u64 {
        self.lock_duration_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_core::{units, LOCK_DURATION_SECS};

    const T0: Timestamp = 1_700_000_000;

    fn buyer() -> Address {
        Address::repeat_byte(0x01)
    }

    fn busd() -> AssetId {
        AssetId::repeat_byte(0xb0)
    }

    fn book_with_order() -> OrderBook {
        let mut book = OrderBook::new(LOCK_DURATION_SECS);
        book.place(&buyer(), &busd(), units(1), units(1), T0).unwrap();
        book
    }

    #[test]
    fn test_place_sets_maturity() {
        let book = book_with_order();
        let order = book.pending(&buyer()).unwrap();
        assert_eq!(order.matures_at, T0 + LOCK_DURATION_SECS);
        assert!(!order.settled);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_second_order_rejected() {
        let mut book = book_with_order();
        let err = book
            .place(&buyer(), &busd(), units(1), units(1), T0 + 1)
            .unwrap_err();
        assert!(matches!(err, RocketError::OrderAlreadyPending { .. }));
        // Original order untouched.
        assert_eq!(book.pending(&buyer()).unwrap().matures_at, T0 + LOCK_DURATION_SECS);
    }

    #[test]
    fn test_settle_without_order() {
        let mut book = OrderBook::new(LOCK_DURATION_SECS);
        assert!(matches!(
            book.settle(&buyer(), T0),
            Err(RocketError::NoOrder { .. })
        ));
    }

    #[test]
    fn test_settle_before_maturity() {
        let mut book = book_with_order();
        let err = book
            .settle(&buyer(), T0 + LOCK_DURATION_SECS - 1)
            .unwrap_err();
        assert!(matches!(err, RocketError::NotMatured { .. }));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_settle_at_maturity_exactly() {
        let mut book = book_with_order();
        let order = book.settle(&buyer(), T0 + LOCK_DURATION_SECS).unwrap();
        assert!(order.settled);
        assert_eq!(order.principal_amount, units(1));
        assert!(book.is_empty());
    }

    #[test]
    fn test_settle_only_once() {
        let mut book = book_with_order();
        book.settle(&buyer(), T0 + LOCK_DURATION_SECS).unwrap();
        assert!(matches!(
            book.settle(&buyer(), T0 + 2 * LOCK_DURATION_SECS),
            Err(RocketError::NoOrder { .. })
        ));
    }

    #[test]
    fn test_new_order_after_settlement() {
        let mut book = book_with_order();
        book.settle(&buyer(), T0 + LOCK_DURATION_SECS).unwrap();
        assert!(book
            .place(&buyer(), &busd(), units(2), units(2), T0 + LOCK_DURATION_SECS)
            .is_ok());
    }

    #[test]
    fn test_outstanding_principal() {
        let mut book = book_with_order();
        book.place(&Address::repeat_byte(0x02), &busd(), units(3), units(2), T0)
            .unwrap();
        assert_eq!(book.outstanding_principal(), units(4));
        assert_eq!(book.orders().len(), 2);
    }

    #[test]
    fn test_maturity_overflow() {
        let mut book = OrderBook::new(LOCK_DURATION_SECS);
        assert!(matches!(
            book.place(&buyer(), &busd(), units(1), units(1), u64::MAX),
            Err(RocketError::Overflow(_))
        ));
    }

    #[test]
    fn test_from_orders_rejects_settled() {
        let mut book = book_with_order();
        let settled = book.settle(&buyer(), T0 + LOCK_DURATION_SECS).unwrap();
        assert!(OrderBook::from_orders(LOCK_DURATION_SECS, vec![settled]).is_err());
    }
}
