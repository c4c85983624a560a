use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use bond_metrics_core::metrics::calculate_bond_metrics;
use bond_metrics_core::types::{with_metadata, CashFlowSeries, Money, Period, Rate};

use crate::input;

const DEFAULT_YIELD: Decimal = rust_decimal_macros::dec!(0.05);

/// Arguments for present value and duration of explicit cash flows
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to a JSON file: {"cash_flows": [...], "yield_rate": "0.05"}
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated cash flows for periods 1..N (e.g. "40,40,1040")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Option<Vec<Decimal>>,

    /// Yield (discount) rate per period; overrides the file value [default: 0.05]
    #[arg(long, allow_hyphen_values = true)]
    pub yield_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct MetricsFile {
    cash_flows: CashFlowSeries,
    #[serde(default)]
    yield_rate: Option<Rate>,
}

#[derive(Debug, Serialize)]
struct PeriodRow {
    period: Period,
    cash_flow: Money,
    present_value: Money,
    weight: Decimal,
}

#[derive(Debug, Serialize)]
struct MetricsOutput {
    yield_rate: Rate,
    total_present_value: Money,
    duration: Decimal,
    periods: Vec<PeriodRow>,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();

    let (series, file_yield) = match (&args.input, args.cash_flows) {
        (Some(path), _) => {
            let file: MetricsFile = input::file::read_json(path)?;
            (file.cash_flows, file.yield_rate)
        }
        (None, Some(flows)) => (CashFlowSeries::new(flows)?, None),
        (None, None) => {
            return Err("--cash-flows <a,b,c> or --input <file.json> required for metrics".into())
        }
    };
    let yield_rate = args.yield_rate.or(file_yield).unwrap_or(DEFAULT_YIELD);

    let metrics = calculate_bond_metrics(&series, yield_rate)?;

    let periods = series
        .iter()
        .zip(metrics.period_present_values.iter().zip(&metrics.weights))
        .map(|((period, cash_flow), (present_value, weight))| PeriodRow {
            period,
            cash_flow,
            present_value: *present_value,
            weight: *weight,
        })
        .collect();

    let output = MetricsOutput {
        yield_rate,
        total_present_value: metrics.total_present_value,
        duration: metrics.duration,
        periods,
    };

    let assumptions = serde_json::json!({
        "timing": "cash flow i paid at period i (1-based)",
        "duration": "(1 / (1 + y)) * sum(w_t * t)"
    });
    let result = with_metadata(
        "Cash Flow Present Value & Duration",
        &assumptions,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        output,
    );
    Ok(serde_json::to_value(result)?)
}
