use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BondMetricsError;
use crate::time_value::{discount, discount_factors};
use crate::types::{CashFlowSeries, Money, Rate};
use crate::BondMetricsResult;

/// Present value and duration of one cash-flow series at one yield.
///
/// All vectors are aligned 1:1 with the periods of the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondMetrics {
    /// Sum of the discounted cash flows (the bond price)
    pub total_present_value: Money,
    /// `C_t / (1 + y)^t` for each period
    pub period_present_values: Vec<Money>,
    /// `PV_t / P` for each period; sums to 1
    pub weights: Vec<Decimal>,
    /// `(1 / (1 + y)) * sum(w_t * t)`, in periods
    pub duration: Decimal,
}

/// Discount a cash-flow series at `yield_rate` and locate its centre of mass.
///
/// ```text
/// PV_t = C_t / (1 + y)^t
/// P    = sum(PV_t)
/// w_t  = PV_t / P
/// D    = (1 / (1 + y)) * sum(w_t * t)
/// ```
///
/// `D` carries one extra discount factor compared with Macaulay duration;
/// it is neither Macaulay nor modified duration.
///
/// Fails fast with `DivisionByZero` when `1 + y = 0` or when the total
/// present value is zero, rather than letting weights become undefined.
pub fn calculate_bond_metrics(
    cash_flows: &CashFlowSeries,
    yield_rate: Rate,
) -> BondMetricsResult<BondMetrics> {
    let one_plus_y = Decimal::ONE + yield_rate;
    if one_plus_y.is_zero() {
        return Err(BondMetricsError::DivisionByZero {
            context: "bond metrics: (1 + yield_rate) is zero".into(),
        });
    }

    let factors = discount_factors(yield_rate, cash_flows.maturity())?;

    let period_present_values = cash_flows
        .iter()
        .zip(&factors)
        .map(|((t, cf), df)| discount(cf, *df, t))
        .collect::<BondMetricsResult<Vec<Money>>>()?;

    let total_present_value = period_present_values
        .iter()
        .try_fold(Decimal::ZERO, |acc, pv| acc.checked_add(*pv))
        .ok_or_else(|| overflow("total present value".into()))?;

    if total_present_value.is_zero() {
        return Err(BondMetricsError::DivisionByZero {
            context: "bond metrics: total present value is zero, weights are undefined".into(),
        });
    }

    let weights = period_present_values
        .iter()
        .map(|pv| {
            pv.checked_div(total_present_value)
                .ok_or_else(|| overflow("cash-flow weight".into()))
        })
        .collect::<BondMetricsResult<Vec<Decimal>>>()?;

    let weighted_time = weights
        .iter()
        .zip(cash_flows.periods())
        .try_fold(Decimal::ZERO, |acc, (w, t)| {
            w.checked_mul(Decimal::from(t))
                .and_then(|wt| acc.checked_add(wt))
        })
        .ok_or_else(|| overflow("weighted time".into()))?;

    let duration = (Decimal::ONE / one_plus_y)
        .checked_mul(weighted_time)
        .ok_or_else(|| overflow("duration".into()))?;

    debug!(
        periods = cash_flows.len(),
        %yield_rate,
        %total_present_value,
        %duration,
        "computed bond metrics"
    );

    Ok(BondMetrics {
        total_present_value,
        period_present_values,
        weights,
        duration,
    })
}

impl BondMetrics {
    /// Sum of the weights; 1 up to decimal rounding.
    pub fn weight_total(&self) -> Decimal {
        self.weights.iter().copied().sum()
    }

    /// Largest single discounted flow, useful for scaling a chart axis.
    pub fn max_present_value(&self) -> Money {
        self.period_present_values
            .iter()
            .copied()
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

fn overflow(context: String) -> BondMetricsError {
    BondMetricsError::ArithmeticOverflow { context }
}
