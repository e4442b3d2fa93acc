use std::num::NonZeroU32;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Rounding applied to every reported monetary figure: two places, ties to even.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Equated monthly installment for an amortizing loan (unrounded).
///
/// `annual_rate_pct` is a percentage (12 means 12% a year). A zero rate splits the principal
/// evenly across the tenure. Computed as `P * r / (1 - (1 + r)^-n)` in decimal arithmetic, so
/// the result does not depend on platform float behavior and tends to `P * r` as the tenure
/// grows. Only a principal-times-rate product beyond the `Decimal` range saturates at
/// [`Decimal::MAX`].
pub fn monthly_installment(
    principal: Decimal,
    annual_rate_pct: Decimal,
    tenure_months: NonZeroU32,
) -> Decimal {
    let months = Decimal::from(tenure_months.get());
    let monthly_rate = annual_rate_pct / MONTHS_PER_YEAR / PERCENT;

    if monthly_rate.is_zero() {
        return principal / months;
    }

    amortize_decimal(principal, monthly_rate, tenure_months)
        .or_else(|| amortize_float(principal, monthly_rate, tenure_months))
        .unwrap_or(Decimal::MAX)
}

/// `(1 + rate)^-months`; a growth factor past the `Decimal` range discounts to zero.
fn discount_factor(rate: Decimal, months: NonZeroU32) -> Option<Decimal> {
    match (Decimal::ONE + rate).checked_powi(i64::from(months.get())) {
        Some(growth) => Decimal::ONE.checked_div(growth),
        None if rate.is_sign_positive() => Some(Decimal::ZERO),
        None => None,
    }
}

fn amortize_decimal(principal: Decimal, rate: Decimal, months: NonZeroU32) -> Option<Decimal> {
    let denominator = Decimal::ONE.checked_sub(discount_factor(rate, months)?)?;
    if denominator.is_zero() {
        return principal.checked_div(Decimal::from(months.get()));
    }
    principal.checked_mul(rate)?.checked_div(denominator)
}

fn amortize_float(principal: Decimal, rate: Decimal, months: NonZeroU32) -> Option<Decimal> {
    let rate = rate.to_f64()?;
    let discount = (1.0 + rate).powi(-i32::try_from(months.get()).ok()?);
    let emi = principal.to_f64()? * rate / (1.0 - discount);
    if emi.is_finite() {
        Decimal::from_f64(emi)
    } else {
        None
    }
}
