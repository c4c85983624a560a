use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use bond_metrics_core::cash_flows::{self, RepaymentPolicy};
use bond_metrics_core::types::{with_metadata, Money, Period};

use super::simulate::ScenarioArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Interest every period, principal at maturity
    Bullet,
    /// Level annuity payment every period
    Amortized,
}

impl From<PolicyArg> for RepaymentPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Bullet => RepaymentPolicy::Bullet,
            PolicyArg::Amortized => RepaymentPolicy::Amortized,
        }
    }
}

/// Arguments for cash-flow generation
#[derive(Args)]
pub struct CashFlowsArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Repayment structure
    #[arg(long, value_enum, default_value = "bullet")]
    pub policy: PolicyArg,
}

#[derive(Debug, Serialize)]
struct CashFlowRow {
    period: Period,
    cash_flow: Money,
}

#[derive(Debug, Serialize)]
struct CashFlowsOutput {
    policy: RepaymentPolicy,
    total: Money,
    periods: Vec<CashFlowRow>,
}

pub fn run_cash_flows(args: CashFlowsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let params = args.scenario.resolve()?;
    let policy = RepaymentPolicy::from(args.policy);
    let series = cash_flows::generate_cash_flows(&params, policy)?;

    let output = CashFlowsOutput {
        policy,
        total: series.total(),
        periods: series
            .iter()
            .map(|(period, cash_flow)| CashFlowRow { period, cash_flow })
            .collect(),
    };

    let rate = match policy {
        RepaymentPolicy::Bullet => params.coupon_rate,
        RepaymentPolicy::Amortized => params.amortization_rate(),
    };
    let assumptions = serde_json::json!({
        "maturity": params.maturity,
        "face_value": params.face_value.to_string(),
        "rate": rate.to_string(),
    });
    let result = with_metadata(
        &format!("Cash Flow Schedule ({})", policy.label()),
        &assumptions,
        params.warnings(),
        start.elapsed().as_micros() as u64,
        output,
    );
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_rows() {
        let args = CashFlowsArgs {
            scenario: ScenarioArgs {
                maturity: Some(3),
                ..Default::default()
            },
            policy: PolicyArg::Bullet,
        };
        let value = run_cash_flows(args).unwrap();
        let rows = value["result"]["periods"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["period"], 3);
        assert_eq!(value["result"]["policy"], "bullet");
        assert!(value["methodology"].as_str().unwrap().contains("Bullet"));
    }

    #[test]
    fn test_amortized_zero_rate_fails() {
        let args = CashFlowsArgs {
            scenario: ScenarioArgs {
                mortgage_rate: Some(rust_decimal::Decimal::ZERO),
                ..Default::default()
            },
            policy: PolicyArg::Amortized,
        };
        let err = run_cash_flows(args).unwrap_err();
        assert!(err.to_string().contains("Division by zero"), "{err}");
    }
}
