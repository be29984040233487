//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts stay `rust_decimal::Decimal` until the moment they are displayed
//! or handed to an encoder that only understands floats.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places used when displaying an amount.
pub const MONEY_SCALE: u32 = 2;

/// Formats an amount with exactly two decimal places.
///
/// Rounds half away from zero, the way receipts are printed.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}
