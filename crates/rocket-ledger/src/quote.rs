// crates/rocket-ledger/src/quote.rs
//
// Discounted pricing of principal in market (quote-currency) units.
//
// The oracle values both sides in a common reference currency, and the
// discount curve supplies a multiplier for the lock duration:
//
//   price = floor(amount * principal_unit_value * num / (market_unit_value * den))
//
// where the unit values are what the oracle reports for one whole unit
// (10^18 base units) of each asset. Only the final division floors, so the
// price never exceeds the exact discounted value and dust amounts still
// price instead of hitting a zero oracle value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rocket_core::{
    Amount, AssetId, Discount, DiscountCurve, PriceOracle, RocketError, UNIT,
};

/// Result of pricing a principal amount in a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub market: AssetId,
    pub principal_amount: Amount,
    /// Discounted price in market base units.
    pub price: Amount,
    /// Multiplier the curve returned for this request.
    pub discount: Discount,
}

/// Combines a price oracle and a discount curve into a price.
///
/// Stateless apart from its collaborators: quoting has no side effects, but
/// two calls may disagree if the collaborators move between them.
#[derive(Clone)]
pub struct QuoteEngine {
    oracle: Arc<dyn PriceOracle>,
    curve: Arc<dyn DiscountCurve>,
    principal_asset: AssetId,
    reference_currency: String,
    lock_duration_secs: u64,
}

impl QuoteEngine {
    pub fn new(
        oracle: Arc<dyn PriceOracle>,
        curve: Arc<dyn DiscountCurve>,
        principal_asset: AssetId,
        reference_currency: impl Into<String>,
        lock_duration_secs: u64,
    ) -> Self {
        Self {
            oracle,
            curve,
            principal_asset,
            reference_currency: reference_currency.into(),
            lock_duration_secs,
        }
    }

    /// Price `principal_amount` of the principal asset in `market` units.
    ///
    /// # Errors
    /// - `InvalidAmount` if `principal_amount` is zero.
    /// - `DivisionByZero` if the curve denominator or the market value is zero.
    /// - `Overflow` if an intermediate product exceeds 256 bits.
    /// - Any error raised by the oracle or curve.
    pub fn quote(&self, market: &AssetId, principal_amount: Amount) -> Result<Quote, RocketError> {
        if principal_amount.is_zero() {
            return Err(RocketError::InvalidAmount(
                "cannot quote a zero principal amount".to_string(),
            ));
        }

        let discount = self
            .curve
            .discount(market, principal_amount, self.lock_duration_secs)?;
        discount.validate()?;

        let principal_unit_value = self.oracle.price_in_currency(
            &self.reference_currency,
            &self.principal_asset,
            UNIT,
        )?;
        let market_unit_value =
            self.oracle
                .price_in_currency(&self.reference_currency, market, UNIT)?;
        if market_unit_value.is_zero() {
            return Err(RocketError::DivisionByZero(format!(
                "oracle values market {} at zero",
                market
            )));
        }

        let overflow = || RocketError::Overflow(format!("quote for market {}", market));
        let numerator = principal_amount
            .checked_mul(principal_unit_value)
            .and_then(|v| v.checked_mul(discount.numerator))
            .ok_or_else(overflow)?;
        let denominator = market_unit_value
            .checked_mul(discount.denominator)
            .ok_or_else(overflow)?;
        let price = numerator / denominator;

        tracing::debug!(
            "Quoted {} principal in market {}: price {} ({}/{})",
            principal_amount,
            market,
            price,
            discount.numerator,
            discount.denominator
        );

        Ok(Quote {
            market: *market,
            principal_amount,
            price,
            discount,
        })
    }

    pub fn principal_asset(&self) -> AssetId {
        self.principal_asset
    }

    pub fn lock_duration_secs(&self) -> u64 {
        self.lock_duration_secs
    }
}
