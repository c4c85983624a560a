use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BondMetricsError;
use crate::BondMetricsResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Whole periods (years in the reference scenarios). Period 0 is the
/// valuation date and never carries a cash flow.
pub type Period = u32;

/// An ordered, non-empty series of periodic cash flows.
///
/// Entry `i` of the series is paid at period `i + 1`, so index order is
/// time order and the series cannot be reordered once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Money>", into = "Vec<Money>")]
pub struct CashFlowSeries {
    flows: Vec<Money>,
}

impl CashFlowSeries {
    pub fn new(flows: Vec<Money>) -> BondMetricsResult<Self> {
        if flows.is_empty() {
            return Err(BondMetricsError::InsufficientData(
                "A cash flow series needs at least one period".into(),
            ));
        }
        Ok(Self { flows })
    }

    /// Number of periods in the series (always >= 1).
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn amounts(&self) -> &[Money] {
        &self.flows
    }

    /// Period indices `1..=N`, aligned with [`amounts`](Self::amounts).
    pub fn periods(&self) -> Vec<Period> {
        (1..=self.flows.len() as Period).collect()
    }

    /// `(period, amount)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (Period, Money)> + '_ {
        self.flows
            .iter()
            .enumerate()
            .map(|(i, amount)| (i as Period + 1, *amount))
    }

    /// Undiscounted sum of all flows.
    pub fn total(&self) -> Money {
        self.flows.iter().copied().sum()
    }

    /// The last (maturity) period.
    pub fn maturity(&self) -> Period {
        self.flows.len() as Period
    }
}

impl TryFrom<Vec<Money>> for CashFlowSeries {
    type Error = BondMetricsError;

    fn try_from(flows: Vec<Money>) -> Result<Self, Self::Error> {
        CashFlowSeries::new(flows)
    }
}

impl From<CashFlowSeries> for Vec<Money> {
    fn from(series: CashFlowSeries) -> Self {
        series.flows
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
