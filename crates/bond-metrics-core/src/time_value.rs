use rust_decimal::Decimal;
use tracing::debug;

use crate::error::BondMetricsError;
use crate::types::{Money, Period, Rate};
use crate::BondMetricsResult;

/// `(1 + rate)^periods` by iterative multiplication, or `None` once the
/// product leaves the range of `Decimal`.
///
/// Stays in full decimal precision (no `powd()`).
pub fn growth_factor(rate: Rate, periods: Period) -> Option<Decimal> {
    let one_plus_r = Decimal::ONE + rate;
    (1..=periods).try_fold(Decimal::ONE, |factor, _| factor.checked_mul(one_plus_r))
}

/// Compounding factors `(1 + rate)^t` for `t = 1..=periods`.
///
/// A factor beyond `Decimal::MAX` is returned as `None`: any cash flow
/// divided by it is below the smallest representable amount, so callers
/// discount it to zero (see [`discount`]). Every later factor is `None` too.
///
/// A factor that rounds to zero would turn every later discount into a
/// division by zero, so it is rejected at the period where it appears.
pub fn discount_factors(rate: Rate, periods: Period) -> BondMetricsResult<Vec<Option<Decimal>>> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r.is_zero() {
        return Err(BondMetricsError::DivisionByZero {
            context: "discounting: (1 + rate) is zero".into(),
        });
    }

    let mut factors = Vec::with_capacity(periods as usize);
    let mut df = Some(Decimal::ONE);

    for t in 1..=periods {
        df = df.and_then(|d| d.checked_mul(one_plus_r));
        if df.is_some_and(|d| d.is_zero()) {
            return Err(BondMetricsError::DivisionByZero {
                context: format!("discount factor at period {t} underflowed to zero"),
            });
        }
        factors.push(df);
    }

    if let Some(t) = factors.iter().position(Option::is_none) {
        debug!(period = t + 1, %rate, "discount factors saturated");
    }

    Ok(factors)
}

/// `cash_flow / factor`, with a saturated factor discounting to zero.
pub fn discount(
    cash_flow: Money,
    factor: Option<Decimal>,
    period: Period,
) -> BondMetricsResult<Money> {
    match factor {
        Some(df) => cash_flow
            .checked_div(df)
            .ok_or_else(|| BondMetricsError::ArithmeticOverflow {
                context: format!("present value at period {period}"),
            }),
        None => Ok(Decimal::ZERO),
    }
}
