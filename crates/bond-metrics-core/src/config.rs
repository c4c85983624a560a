//! Scenario parameters shared by the cash-flow generator and the metrics
//! calculator.
//!
//! Every field carries a serde default, so a JSON scenario file only needs
//! to name the values it changes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BondMetricsError;
use crate::types::{Money, Period, Rate};
use crate::BondMetricsResult;

/// Longest maturity accepted, in periods. Cash-flow series are held in
/// memory one entry per period; at any positive yield flows this far out
/// discount to zero.
pub const MAX_MATURITY: Period = 10_000;

/// Economic parameters of one bond scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondParameters {
    /// Maturity in whole periods (default 20)
    pub maturity: Period,
    /// Discount (yield) rate per period as a decimal (default 0.05)
    pub yield_rate: Rate,
    /// Face / principal amount (default 1,000,000)
    pub face_value: Money,
    /// Coupon rate per period for bullet repayment (default 0.04)
    pub coupon_rate: Rate,
    /// Loan rate per period for amortized repayment; falls back to
    /// `coupon_rate` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortgage_rate: Option<Rate>,
}

impl Default for BondParameters {
    fn default() -> Self {
        Self {
            maturity: 20,
            yield_rate: dec!(0.05),
            face_value: dec!(1000000),
            coupon_rate: dec!(0.04),
            mortgage_rate: None,
        }
    }
}

impl BondParameters {
    /// Parse a (possibly partial) JSON scenario.
    pub fn from_json(json: &str) -> BondMetricsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rate used by the amortized (annuity) policy.
    pub fn amortization_rate(&self) -> Rate {
        self.mortgage_rate.unwrap_or(self.coupon_rate)
    }

    /// Reject parameters the generator or the calculator cannot evaluate.
    pub fn validate(&self) -> BondMetricsResult<()> {
        if !(1..=MAX_MATURITY).contains(&self.maturity) {
            return Err(BondMetricsError::InvalidInput {
                field: "maturity".into(),
                reason: format!("Maturity must be between 1 and {MAX_MATURITY} periods."),
            });
        }
        if self.face_value <= Decimal::ZERO {
            return Err(BondMetricsError::InvalidInput {
                field: "face_value".into(),
                reason: "Face value must be positive.".into(),
            });
        }
        if (Decimal::ONE + self.yield_rate).is_zero() {
            return Err(BondMetricsError::InvalidInput {
                field: "yield_rate".into(),
                reason: "Yield rate of -100% makes every discount factor zero.".into(),
            });
        }
        Ok(())
    }

    /// Economically unusual but computable inputs.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let unit = Decimal::ZERO..=Decimal::ONE;

        if !unit.contains(&self.coupon_rate) {
            warnings.push(format!(
                "Coupon rate {} is outside the conventional [0, 1] range",
                self.coupon_rate
            ));
        }
        if let Some(rate) = self.mortgage_rate {
            if !unit.contains(&rate) {
                warnings.push(format!(
                    "Mortgage rate {rate} is outside the conventional [0, 1] range"
                ));
            }
        }
        if self.yield_rate < dec!(-1) {
            warnings.push(format!(
                "Yield rate {} is below -100%; discount factors alternate in sign",
                self.yield_rate
            ));
        }
        warnings
    }
}
