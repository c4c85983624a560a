//! Cash-flow generation for the two repayment structures.
//!
//! * **Bullet** (treasury-style): interest every period, principal in a
//!   lump sum with the last coupon.
//! * **Amortized** (mortgage-style): one level annuity payment per period
//!   covering both interest and principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BondParameters, MAX_MATURITY};
use crate::error::BondMetricsError;
use crate::time_value::growth_factor;
use crate::types::{CashFlowSeries, Money, Period, Rate};
use crate::BondMetricsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How principal is returned to the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentPolicy {
    /// Interest-only periods, principal at maturity
    Bullet,
    /// Level annuity payment every period
    Amortized,
}

impl RepaymentPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            RepaymentPolicy::Bullet => "Bullet Repayment",
            RepaymentPolicy::Amortized => "Amortized",
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the cash flows of `params` under `policy`.
///
/// Bullet uses `coupon_rate`; amortized uses
/// [`BondParameters::amortization_rate`].
pub fn generate_cash_flows(
    params: &BondParameters,
    policy: RepaymentPolicy,
) -> BondMetricsResult<CashFlowSeries> {
    match policy {
        RepaymentPolicy::Bullet => {
            bullet_cash_flows(params.maturity, params.face_value, params.coupon_rate)
        }
        RepaymentPolicy::Amortized => amortized_cash_flows(
            params.maturity,
            params.face_value,
            params.amortization_rate(),
        ),
    }
}

/// Coupon `face_value * coupon_rate` in periods `1..N`, coupon plus
/// principal in period `N`.
pub fn bullet_cash_flows(
    maturity: Period,
    face_value: Money,
    coupon_rate: Rate,
) -> BondMetricsResult<CashFlowSeries> {
    validate_maturity(maturity)?;

    let coupon = face_value
        .checked_mul(coupon_rate)
        .ok_or_else(|| BondMetricsError::ArithmeticOverflow {
            context: "bullet coupon".into(),
        })?;
    let final_payment =
        coupon
            .checked_add(face_value)
            .ok_or_else(|| BondMetricsError::ArithmeticOverflow {
                context: "bullet final payment".into(),
            })?;

    let mut flows = vec![coupon; maturity as usize - 1];
    flows.push(final_payment);

    debug!(maturity, %coupon, "generated bullet cash flows");
    CashFlowSeries::new(flows)
}

/// Level payment that amortizes `face_value` over `periods` at `rate`:
///
/// `payment = F * r * (1+r)^N / ((1+r)^N - 1)`
///
/// When `(1+r)^N` is beyond the range of `Decimal` the ratio is 1 to full
/// precision and the payment is the interest-only `F * r`.
pub fn annuity_payment(face_value: Money, rate: Rate, periods: Period) -> BondMetricsResult<Money> {
    validate_maturity(periods)?;

    let interest = face_value
        .checked_mul(rate)
        .ok_or_else(|| BondMetricsError::ArithmeticOverflow {
            context: "annuity interest".into(),
        })?;

    let Some(factor) = growth_factor(rate, periods) else {
        debug!(periods, %rate, "annuity growth factor saturated");
        return Ok(interest);
    };

    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(BondMetricsError::DivisionByZero {
            context: format!("annuity payment: (1 + {rate})^{periods} - 1 is zero"),
        });
    }

    factor
        .checked_div(denominator)
        .and_then(|ratio| interest.checked_mul(ratio))
        .ok_or_else(|| BondMetricsError::ArithmeticOverflow {
            context: "annuity payment".into(),
        })
}

/// The same annuity payment in every one of `maturity` periods.
pub fn amortized_cash_flows(
    maturity: Period,
    face_value: Money,
    rate: Rate,
) -> BondMetricsResult<CashFlowSeries> {
    let payment = annuity_payment(face_value, rate, maturity)?;

    debug!(maturity, %payment, "generated amortized cash flows");
    CashFlowSeries::new(vec![payment; maturity as usize])
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_maturity(maturity: Period) -> BondMetricsResult<()> {
    if !(1..=MAX_MATURITY).contains(&maturity) {
        return Err(BondMetricsError::InvalidInput {
            field: "maturity".into(),
            reason: format!("Maturity must be between 1 and {MAX_MATURITY} periods."),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
