// crates/rocket-core/src/units.rs
//
// Fixed-point token units.
//
// Every asset handled by the desk uses 18 decimals, so 1 token = 10^18 base
// units. All internal accounting happens in base units to avoid
// floating-point precision issues; decimal strings only appear at the CLI edge.

use crate::error::RocketError;
use crate::types::Amount;

/// Number of decimal places for every asset.
pub const DECIMALS: usize = 18;

/// Base units in one whole token: 10^18.
pub const UNIT: Amount = Amount::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// `whole` tokens expressed in base units.
pub fn units(whole: u64) -> Amount {
    Amount::from(whole) * UNIT
}

/// Compute `floor(a * b / c)` with a 256-bit checked product.
///
/// # Errors
/// `DivisionByZero` if `c` is zero, `Overflow` if `a * b` does not fit.
pub fn mul_div(a: Amount, b: Amount, c: Amount) -> Result<Amount, RocketError> {
    if c.is_zero() {
        return Err(RocketError::DivisionByZero(format!(
            "mul_div({}, {}, 0)",
            a, b
        )));
    }
    let product = a
        .checked_mul(b)
        .ok_or_else(|| RocketError::Overflow(format!("{} * {}", a, b)))?;
    Ok(product / c)
}

/// Parse a decimal token amount such as `"100"` or `"0.9"` into base units.
///
/// # Errors
/// `InvalidAmount` on empty input, non-digit characters, more than
/// `DECIMALS` fractional digits, or a value that does not fit in 256 bits.
pub fn parse_units(text: &str) -> Result<Amount, RocketError> {
    let text = text.trim();
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(RocketError::InvalidAmount(format!(
            "'{}' is not a token amount",
            text
        )));
    }
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !is_digits(whole) || !is_digits(frac) {
        return Err(RocketError::InvalidAmount(format!(
            "'{}' is not a token amount",
            text
        )));
    }
    if frac.len() > DECIMALS {
        return Err(RocketError::InvalidAmount(format!(
            "'{}' has more than {} decimal places",
            text, DECIMALS
        )));
    }

    let overflow = || RocketError::InvalidAmount(format!("'{}' is too large", text));
    let whole_units = if whole.is_empty() {
        Amount::ZERO
    } else {
        Amount::from_str_radix(whole, 10).map_err(|_| overflow())?
    };
    let frac_units = if frac.is_empty() {
        Amount::ZERO
    } else {
        let padded = format!("{:0<width$}", frac, width = DECIMALS);
        Amount::from_str_radix(&padded, 10).map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(UNIT)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Render base units as a decimal token amount, trimming trailing zeros.
pub fn format_units(amount: Amount) -> String {
    let whole = amount / UNIT;
    let frac = amount % UNIT;
    if frac.is_zero() {
        whole.to_string()
    } else {
        let frac_str = format!("{:0>width$}", frac.to_string(), width = DECIMALS);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}
