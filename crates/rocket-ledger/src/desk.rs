// crates/rocket-ledger/src/desk.rs
//
// BondDesk: the orchestrator tying allocation, quoting, and orders together.
//
// Control flow:
//   allocate   -> principal pulled into custody, market credited
//   deallocate -> market debited, unsold principal pushed back to the operator
//   quote      -> oracle + discount curve price, no side effects
//   deposit    -> price checked against the buyer's ceiling, market debited,
//                 payment forwarded straight to the treasury, order recorded
//   harvest    -> matured order settled, principal released to the buyer
//
// Every operation reads the clock once and runs every check (including the
// asset transfer) before mutating the ledger, so a failure leaves no trace.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rocket_core::{
    Address, Amount, AssetId, AssetTransfer, Clock, DiscountCurve, PriceOracle, RocketError,
    Timestamp, DEFAULT_REFERENCE_CURRENCY, LOCK_DURATION_SECS,
};

use crate::allocation::{AllocationLedger, Market};
use crate::events::{LedgerEvent, DEFAULT_JOURNAL_CAPACITY};
use crate::orders::{Order, OrderBook};
use crate::quote::{Quote, QuoteEngine};
use crate::snapshot::LedgerSnapshot;

/// Static parameters of a desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Asset sold by the desk and released at harvest.
    pub principal_asset: AssetId,
    /// Receives every deposit's payment.
    pub treasury: Address,
    /// Currency the oracle values both sides of a quote in.
    pub reference_currency: String,
    /// Lock between deposit and harvest, in seconds.
    pub lock_duration_secs: u64,
    /// Most recent events kept in the journal.
    #[serde(default = "default_journal_capacity")]
    pub journal_capacity: usize,
}

fn default_journal_capacity() -> usize {
    DEFAULT_JOURNAL_CAPACITY
}

impl DeskConfig {
    /// A desk with the default reference currency and 21-day lock.
    pub fn new(principal_asset: AssetId, treasury: Address) -> Self {
        Self {
            principal_asset,
            treasury,
            reference_currency: DEFAULT_REFERENCE_CURRENCY.to_string(),
            lock_duration_secs: LOCK_DURATION_SECS,
            journal_capacity: DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

/// External collaborators injected into a desk.
#[derive(Clone)]
pub struct Collaborators {
    pub transfer: Arc<dyn AssetTransfer>,
    pub oracle: Arc<dyn PriceOracle>,
    pub curve: Arc<dyn DiscountCurve>,
    pub clock: Arc<dyn Clock>,
}

/// Outcome of a successful deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Market units paid to the treasury.
    pub price: Amount,
    /// Earliest harvest time.
    pub matures_at: Timestamp,
}

/// Discounted bond-issuance desk for one principal asset.
pub struct BondDesk {
    config: DeskConfig,
    ledger: AllocationLedger,
    quotes: QuoteEngine,
    orders: OrderBook,
    transfer: Arc<dyn AssetTransfer>,
    clock: Arc<dyn Clock>,
    events: Vec<LedgerEvent>,
}

impl BondDesk {
    /// Create a desk with an empty ledger and order book.
    pub fn new(config: DeskConfig, collaborators: Collaborators) -> Self {
        let quotes = QuoteEngine::new(
            collaborators.oracle,
            collaborators.curve,
            config.principal_asset,
            config.reference_currency.clone(),
            config.lock_duration_secs,
        );
        let orders = OrderBook::new(config.lock_duration_secs);
        Self {
            config,
            ledger: AllocationLedger::new(),
            quotes,
            orders,
            transfer: collaborators.transfer,
            clock: collaborators.clock,
            events: Vec::new(),
        }
    }

    /// Rebuild a desk from a snapshot taken with [`BondDesk::snapshot`].
    ///
    /// # Errors
    /// Returns `RocketError::Storage` if the snapshot breaks a ledger invariant.
    pub fn restore(
        config: DeskConfig,
        collaborators: Collaborators,
        snapshot: LedgerSnapshot,
    ) -> Result<Self, RocketError> {
        let mut desk = Self::new(config, collaborators);
        desk.ledger = AllocationLedger::from_markets(snapshot.markets)?;
        desk.orders = OrderBook::from_orders(desk.config.lock_duration_secs, snapshot.orders)?;
        desk.events = snapshot.events;
        desk.trim_journal();
        Ok(desk)
    }

    /// Capture markets, pending orders, and the event journal.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            markets: self.ledger.markets(),
            orders: self.orders.orders(),
            events: self.events.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Operator
    // -----------------------------------------------------------------------

    /// Pull `amount` of principal from `operator` and reserve it for sale in `market`.
    ///
    /// # Errors
    /// `InvalidAmount` for zero, `TransferFailed` if the operator's balance or
    /// allowance is short.
    pub fn allocate(
        &mut self,
        operator: &Address,
        market: &AssetId,
        amount: Amount,
    ) -> Result<Market, RocketError> {
        self.try_allocate(operator, market, amount)
            .map_err(|e| rejected("allocate", e))
    }

    fn try_allocate(
        &mut self,
        operator: &Address,
        market: &AssetId,
        amount: Amount,
    ) -> Result<Market, RocketError> {
        let now = self.clock.now();
        let updated = self.ledger.prepare_allocate(market, amount)?;
        self.transfer
            .transfer_in(&self.config.principal_asset, operator, amount)?;
        self.ledger.apply(updated);

        tracing::info!(
            "Allocated {} principal to market {} (available {})",
            amount,
            market,
            updated.available
        );
        self.record(LedgerEvent::Allocated {
            operator: *operator,
            market: *market,
            amount,
            at: now,
        });
        Ok(updated)
    }

    /// Withdraw `amount` of unsold principal from `market` back to `operator`.
    ///
    /// # Errors
    /// `InvalidAmount` for zero, `InsufficientAllocation` above the market's
    /// available principal, `TransferFailed` if custody cannot pay out.
    pub fn deallocate(
        &mut self,
        operator: &Address,
        market: &AssetId,
        amount: Amount,
    ) -> Result<Market, RocketError> {
        self.try_deallocate(operator, market, amount)
            .map_err(|e| rejected("deallocate", e))
    }

    fn try_deallocate(
        &mut self,
        operator: &Address,
        market: &AssetId,
        amount: Amount,
    ) -> Result<Market, RocketError> {
        let now = self.clock.now();
        let updated = self.ledger.prepare_deallocate(market, amount)?;
        self.transfer
            .transfer_out(&self.config.principal_asset, operator, amount)?;
        self.ledger.apply(updated);

        tracing::info!(
            "Deallocated {} principal from market {} (available {})",
            amount,
            market,
            updated.available
        );
        self.record(LedgerEvent::Deallocated {
            operator: *operator,
            market: *market,
            amount,
            at: now,
        });
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Buyer
    // -----------------------------------------------------------------------

    /// Discounted price of `principal_amount` in `market` units.
    pub fn quote(&self, market: &AssetId, principal_amount: Amount) -> Result<Amount, RocketError> {
        Ok(self.quote_details(market, principal_amount)?.price)
    }

    /// Like [`BondDesk::quote`], also returning the discount applied.
    pub fn quote_details(
        &self,
        market: &AssetId,
        principal_amount: Amount,
    ) -> Result<Quote, RocketError> {
        self.quotes.quote(market, principal_amount)
    }

    /// Buy `principal_amount` of principal in `market`, paying at most `max_price`.
    ///
    /// Checks run in order: quote, price ceiling, available allocation,
    /// pending order, payment transfer. The payment goes straight from the
    /// buyer to the treasury.
    ///
    /// # Errors
    /// - `InvalidAmount` for zero principal or a price that floors to zero.
    /// - `MaxPriceExceeded` if the quote is above `max_price`.
    /// - `InsufficientAllocation` if the market cannot cover the principal.
    /// - `OrderAlreadyPending` if the buyer has not harvested a previous order.
    /// - `TransferFailed` if the buyer's balance or allowance is short.
    /// - Quote errors (`DivisionByZero`, `Overflow`, `Oracle`).
    pub fn deposit(
        &mut self,
        buyer: &Address,
        market: &AssetId,
        principal_amount: Amount,
        max_price: Amount,
    ) -> Result<DepositReceipt, RocketError> {
        self.try_deposit(buyer, market, principal_amount, max_price)
            .map_err(|e| rejected("deposit", e))
    }

    fn try_deposit(
        &mut self,
        buyer: &Address,
        market: &AssetId,
        principal_amount: Amount,
        max_price: Amount,
    ) -> Result<DepositReceipt, RocketError> {
        let now = self.clock.now();

        let price = self.quotes.quote(market, principal_amount)?.price;
        if price.is_zero() {
            return Err(RocketError::InvalidAmount(format!(
                "dust deposit rejected: {} principal prices at zero in market {}",
                principal_amount, market
            )));
        }
        if price > max_price {
            return Err(RocketError::MaxPriceExceeded { price, max_price });
        }
        let updated = self.ledger.prepare_commit(market, principal_amount)?;
        self.orders.ensure_can_place(buyer)?;
        self.orders.maturity_for(now)?;

        self.transfer
            .transfer(market, buyer, &self.config.treasury, price)?;

        self.ledger.apply(updated);
        let order = self
            .orders
            .place(buyer, market, principal_amount, price, now)?;

        tracing::info!(
            "Deposit by {}: {} principal for {} in market {}, matures at {}",
            buyer,
            principal_amount,
            price,
            market,
            order.matures_at
        );
        self.record(LedgerEvent::Deposited {
            buyer: *buyer,
            market: *market,
            principal_amount,
            price,
            treasury: self.config.treasury,
            matures_at: order.matures_at,
            at: now,
        });
        Ok(DepositReceipt {
            price,
            matures_at: order.matures_at,
        })
    }

    /// Release the principal of the caller's matured order.
    ///
    /// # Errors
    /// `NoOrder` if nothing is pending, `NotMatured` before the lock elapses,
    /// `TransferFailed` if custody cannot pay out (the order stays pending).
    pub fn harvest(&mut self, buyer: &Address) -> Result<Amount, RocketError> {
        self.try_harvest(buyer).map_err(|e| rejected("harvest", e))
    }

    fn try_harvest(&mut self, buyer: &Address) -> Result<Amount, RocketError> {
        let now = self.clock.now();
        let principal_amount = self.orders.matured(buyer, now)?.principal_amount;

        self.transfer
            .transfer_out(&self.config.principal_asset, buyer, principal_amount)?;
        let order = self.orders.settle(buyer, now)?;

        tracing::info!(
            "Harvest by {}: released {} principal",
            buyer,
            order.principal_amount
        );
        self.record(LedgerEvent::Harvested {
            buyer: *buyer,
            market: order.market,
            principal_amount: order.principal_amount,
            at: now,
        });
        Ok(order.principal_amount)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn available_of(&self, market: &AssetId) -> Amount {
        self.ledger.available_of(market)
    }

    pub fn allocated_of(&self, market: &AssetId) -> Amount {
        self.ledger.allocated_of(market)
    }

    pub fn market(&self, market: &AssetId) -> Market {
        self.ledger.market(market)
    }

    pub fn markets(&self) -> Vec<Market> {
        self.ledger.markets()
    }

    pub fn pending_order(&self, buyer: &Address) -> Option<Order> {
        self.orders.pending(buyer).cloned()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.orders()
    }

    /// Total principal sold and not yet harvested.
    pub fn outstanding_principal(&self) -> Amount {
        self.orders.outstanding_principal()
    }

    /// Journal of the most recent operations, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
        self.trim_journal();
    }

    fn trim_journal(&mut self) {
        let excess = self.events.len().saturating_sub(self.config.journal_capacity);
        if excess > 0 {
            self.events.drain(..excess);
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Current reading of the injected clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

fn rejected(operation: &str, error: RocketError) -> RocketError {
    tracing::warn!("{} rejected: {}", operation, error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{FixedPriceOracle, FlatDiscountCurve, InMemoryAssets, ManualClock};
    use rocket_core::{units, Discount, UNIT};

    const T0: Timestamp = 1_700_000_000;

    struct Fixture {
        desk: BondDesk,
        assets: Arc<InMemoryAssets>,
        clock: Arc<ManualClock>,
    }

    fn operator() -> Address {
        Address::repeat_byte(0x0a)
    }

    fn buyer() -> Address {
        Address::repeat_byte(0x0b)
    }

    fn treasury() -> Address {
        Address::repeat_byte(0x7e)
    }

    fn custody() -> Address {
        Address::repeat_byte(0xcc)
    }

    fn voodoo() -> AssetId {
        AssetId::repeat_byte(0x70)
    }

    fn busd() -> AssetId {
        AssetId::repeat_byte(0xb0)
    }

    fn ninety_percent() -> Amount {
        UNIT / Amount::from(100u64) * Amount::from(90u64)
    }

    /// Operator and buyer each hold 1000 VOO and 1000 BUSD with unlimited approval.
    fn fixture() -> Fixture {
        fixture_with(DeskConfig::new(voodoo(), treasury()))
    }

    fn fixture_with(config: DeskConfig) -> Fixture {
        let assets = Arc::new(InMemoryAssets::new(custody()));
        for party in [operator(), buyer()] {
            for asset in [voodoo(), busd()] {
                assets.mint(&asset, &party, units(1_000)).unwrap();
                assets.approve(&asset, &party, Amount::MAX).unwrap();
            }
        }
        let oracle = FixedPriceOracle::new()
            .with_price(voodoo(), UNIT)
            .with_price(busd(), UNIT);
        let clock = Arc::new(ManualClock::new(T0));
        let desk = BondDesk::new(
            config,
            Collaborators {
                transfer: assets.clone(),
                oracle: Arc::new(oracle),
                curve: Arc::new(FlatDiscountCurve::new(Discount::new(9, 10))),
                clock: clock.clone(),
            },
        );
        Fixture {
            desk,
            assets,
            clock,
        }
    }

    fn allocated_fixture() -> Fixture {
        let mut f = fixture();
        f.desk.allocate(&operator(), &busd(), units(100)).unwrap();
        f
    }

    #[test]
    fn test_allocate_moves_principal_into_custody() {
        let f = allocated_fixture();
        assert_eq!(f.desk.allocated_of(&busd()), units(100));
        assert_eq!(f.desk.available_of(&busd()), units(100));
        assert_eq!(f.assets.balance_of(&voodoo(), &custody()).unwrap(), units(100));
        assert_eq!(f.assets.balance_of(&voodoo(), &operator()).unwrap(), units(900));
    }

    #[test]
    fn test_allocate_without_allowance_changes_nothing() {
        let mut f = fixture();
        f.assets.approve(&voodoo(), &operator(), Amount::ZERO).unwrap();
        let err = f.desk.allocate(&operator(), &busd(), units(1)).unwrap_err();
        assert!(matches!(err, RocketError::TransferFailed(_)));
        assert_eq!(f.desk.allocated_of(&busd()), Amount::ZERO);
        assert!(f.desk.events().is_empty());
    }

    #[test]
    fn test_allocate_deallocate_round_trip() {
        let mut f = allocated_fixture();
        f.desk.deallocate(&operator(), &busd(), units(100)).unwrap();
        assert_eq!(f.desk.allocated_of(&busd()), Amount::ZERO);
        assert_eq!(f.desk.available_of(&busd()), Amount::ZERO);
        assert_eq!(f.assets.balance_of(&voodoo(), &operator()).unwrap(), units(1_000));
        assert_eq!(f.assets.balance_of(&voodoo(), &custody()).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_deallocate_above_available() {
        let mut f = allocated_fixture();
        let err = f.desk.deallocate(&operator(), &busd(), units(101)).unwrap_err();
        assert!(matches!(err, RocketError::InsufficientAllocation { .. }));
    }

    #[test]
    fn test_deallocate_with_failed_payout_changes_nothing() {
        let mut f = allocated_fixture();

        // Drain custody behind the desk's back.
        let custody_balance = f.assets.balance_of(&voodoo(), &custody()).unwrap();
        f.assets
            .transfer_out(&voodoo(), &operator(), custody_balance)
            .unwrap();
        let operator_balance = f.assets.balance_of(&voodoo(), &operator()).unwrap();

        let err = f.desk.deallocate(&operator(), &busd(), units(40)).unwrap_err();
        assert!(matches!(err, RocketError::TransferFailed(_)));
        assert_eq!(f.desk.allocated_of(&busd()), units(100));
        assert_eq!(f.desk.available_of(&busd()), units(100));
        assert_eq!(f.desk.events().len(), 1);
        assert_eq!(f.desk.events()[0].kind(), "allocated");
        assert_eq!(
            f.assets.balance_of(&voodoo(), &operator()).unwrap(),
            operator_balance
        );
    }

    #[test]
    fn test_quote_matches_discount() {
        let f = allocated_fixture();
        assert_eq!(f.desk.quote(&busd(), UNIT).unwrap(), ninety_percent());
        // Quoting has no side effects.
        assert_eq!(f.desk.available_of(&busd()), units(100));
    }

    #[test]
    fn test_deposit_pays_treasury_and_records_order() {
        let mut f = allocated_fixture();
        let receipt = f
            .desk
            .deposit(&buyer(), &busd(), UNIT, ninety_percent())
            .unwrap();
        assert_eq!(receipt.price, ninety_percent());
        assert_eq!(receipt.matures_at, T0 + LOCK_DURATION_SECS);
        assert_eq!(f.assets.balance_of(&busd(), &treasury()).unwrap(), ninety_percent());
        assert_eq!(f.assets.balance_of(&busd(), &custody()).unwrap(), Amount::ZERO);
        assert_eq!(f.desk.available_of(&busd()), units(99));
        assert_eq!(f.desk.allocated_of(&busd()), units(100));

        let order = f.desk.pending_order(&buyer()).unwrap();
        assert_eq!(order.principal_amount, UNIT);
        assert_eq!(order.price_paid, ninety_percent());
        assert!(!order.settled);
    }

    #[test]
    fn test_deposit_price_boundary() {
        let mut f = allocated_fixture();
        let err = f
            .desk
            .deposit(&buyer(), &busd(), UNIT, ninety_percent() - Amount::from(1u64))
            .unwrap_err();
        assert!(matches!(err, RocketError::MaxPriceExceeded { .. }));
        assert!(f.desk.pending_order(&buyer()).is_none());
        assert!(f.desk.deposit(&buyer(), &busd(), UNIT, ninety_percent()).is_ok());
    }

    #[test]
    fn test_deposit_allocation_boundary() {
        let mut f = allocated_fixture();
        let err = f
            .desk
            .deposit(&buyer(), &busd(), units(100) + Amount::from(1u64), Amount::MAX)
            .unwrap_err();
        assert!(matches!(err, RocketError::InsufficientAllocation { .. }));
        assert!(f
            .desk
            .deposit(&buyer(), &busd(), units(100), Amount::MAX)
            .is_ok());
        assert_eq!(f.desk.available_of(&busd()), Amount::ZERO);
    }

    #[test]
    fn test_price_check_precedes_allocation_check() {
        let mut f = allocated_fixture();
        let err = f
            .desk
            .deposit(&buyer(), &busd(), units(101), Amount::ZERO)
            .unwrap_err();
        assert!(matches!(err, RocketError::MaxPriceExceeded { .. }));
    }

    #[test]
    fn test_second_deposit_rejected_without_side_effects() {
        let mut f = allocated_fixture();
        f.desk.deposit(&buyer(), &busd(), UNIT, Amount::MAX).unwrap();
        let err = f
            .desk
            .deposit(&buyer(), &busd(), UNIT, Amount::MAX)
            .unwrap_err();
        assert!(matches!(err, RocketError::OrderAlreadyPending { .. }));
        assert_eq!(f.desk.available_of(&busd()), units(99));
        assert_eq!(f.assets.balance_of(&busd(), &treasury()).unwrap(), ninety_percent());
    }

    #[test]
    fn test_deposit_with_failed_payment_is_atomic() {
        let mut f = allocated_fixture();
        f.assets.approve(&busd(), &buyer(), Amount::ZERO).unwrap();
        let err = f
            .desk
            .deposit(&buyer(), &busd(), UNIT, Amount::MAX)
            .unwrap_err();
        assert!(matches!(err, RocketError::TransferFailed(_)));
        assert_eq!(f.desk.available_of(&busd()), units(100));
        assert!(f.desk.pending_order(&buyer()).is_none());
    }

    #[test]
    fn test_deposit_of_dust_that_prices_at_zero() {
        let mut f = allocated_fixture();
        // 1 base unit * 9/10 floors to zero.
        let err = f
            .desk
            .deposit(&buyer(), &busd(), Amount::from(1u64), Amount::MAX)
            .unwrap_err();
        match err {
            RocketError::InvalidAmount(msg) => assert!(msg.contains("dust deposit")),
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
        assert_eq!(f.desk.available_of(&busd()), units(100));
        assert!(f.desk.pending_order(&buyer()).is_none());
    }

    #[test]
    fn test_harvest_lifecycle() {
        let mut f = allocated_fixture();
        assert!(matches!(
            f.desk.harvest(&buyer()),
            Err(RocketError::NoOrder { .. })
        ));

        f.desk.deposit(&buyer(), &busd(), UNIT, Amount::MAX).unwrap();
        f.clock.advance(LOCK_DURATION_SECS - 1);
        assert!(matches!(
            f.desk.harvest(&buyer()),
            Err(RocketError::NotMatured { .. })
        ));

        f.clock.advance(1);
        let before = f.assets.balance_of(&voodoo(), &buyer()).unwrap();
        assert_eq!(f.desk.harvest(&buyer()).unwrap(), UNIT);
        assert_eq!(f.assets.balance_of(&voodoo(), &buyer()).unwrap(), before + UNIT);
        assert!(f.desk.pending_order(&buyer()).is_none());

        assert!(matches!(
            f.desk.harvest(&buyer()),
            Err(RocketError::NoOrder { .. })
        ));
    }

    #[test]
    fn test_harvest_with_failed_payout_keeps_order() {
        let mut f = allocated_fixture();
        f.desk.deposit(&buyer(), &busd(), UNIT, Amount::MAX).unwrap();
        f.clock.advance(LOCK_DURATION_SECS);

        // Drain custody behind the desk's back.
        let custody_balance = f.assets.balance_of(&voodoo(), &custody()).unwrap();
        f.assets
            .transfer_out(&voodoo(), &operator(), custody_balance)
            .unwrap();

        assert!(matches!(
            f.desk.harvest(&buyer()),
            Err(RocketError::TransferFailed(_))
        ));
        assert!(f.desk.pending_order(&buyer()).is_some());
    }

    #[test]
    fn test_events_journal() {
        let mut f = allocated_fixture();
        f.desk.deposit(&buyer(), &busd(), UNIT, Amount::MAX).unwrap();
        f.clock.advance(LOCK_DURATION_SECS);
        f.desk.harvest(&buyer()).unwrap();

        let kinds: Vec<&str> = f.desk.events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["allocated", "deposited", "harvested"]);
        assert_eq!(f.desk.events()[2].at(), T0 + LOCK_DURATION_SECS);
    }

    #[test]
    fn test_journal_keeps_most_recent_events() {
        let mut config = DeskConfig::new(voodoo(), treasury());
        config.journal_capacity = 3;
        let mut f = fixture_with(config);

        for _ in 0..4 {
            f.desk.allocate(&operator(), &busd(), units(1)).unwrap();
            f.clock.advance(1);
        }
        f.desk.deallocate(&operator(), &busd(), units(1)).unwrap();

        let events = f.desk.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].at(), T0 + 2);
        assert_eq!(events[2].kind(), "deallocated");
        assert_eq!(f.desk.snapshot().events.len(), 3);
    }

    #[test]
    fn test_restore_trims_oversized_journal() {
        let mut f = allocated_fixture();
        f.desk.deposit(&buyer(), &busd(), UNIT, Amount::MAX).unwrap();
        let snapshot = f.desk.snapshot();
        assert_eq!(snapshot.events.len(), 2);

        let mut config = f.desk.config().clone();
        config.journal_capacity = 1;
        let restored = BondDesk::restore(
            config,
            Collaborators {
                transfer: f.assets.clone(),
                oracle: Arc::new(
                    FixedPriceOracle::new()
                        .with_price(voodoo(), UNIT)
                        .with_price(busd(), UNIT),
                ),
                curve: Arc::new(FlatDiscountCurve::new(Discount::new(9, 10))),
                clock: f.clock.clone(),
            },
            snapshot,
        )
        .unwrap();
        assert_eq!(restored.events().len(), 1);
        assert_eq!(restored.events()[0].kind(), "deposited");
    }

    #[test]
    fn test_snapshot_restore() {
        let mut f = allocated_fixture();
        f.desk.deposit(&buyer(), &busd(), UNIT, Amount::MAX).unwrap();
        let snapshot = f.desk.snapshot();

        let oracle = FixedPriceOracle::new()
            .with_price(voodoo(), UNIT)
            .with_price(busd(), UNIT);
        let restored = BondDesk::restore(
            f.desk.config().clone(),
            Collaborators {
                transfer: f.assets.clone(),
                oracle: Arc::new(oracle),
                curve: Arc::new(FlatDiscountCurve::new(Discount::new(9, 10))),
                clock: f.clock.clone(),
            },
            snapshot,
        )
        .unwrap();

        assert_eq!(restored.available_of(&busd()), units(99));
        assert_eq!(restored.pending_order(&buyer()), f.desk.pending_order(&buyer()));
        assert_eq!(restored.events().len(), 2);
        assert_eq!(restored.outstanding_principal(), UNIT);
    }

    #[test]
    fn test_markets_are_independent() {
        let mut f = allocated_fixture();
        let other = AssetId::repeat_byte(0xd0);
        f.desk.allocate(&operator(), &other, units(5)).unwrap();
        assert_eq!(f.desk.markets().len(), 2);
        // `other` has no oracle price.
        assert!(matches!(
            f.desk.deposit(&buyer(), &other, units(6), Amount::MAX),
            Err(RocketError::Oracle(_))
        ));
        assert_eq!(f.desk.available_of(&busd()), units(100));
    }
}
