use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt::Write;

use super::{decimal_field, format_thousands};

/// Print the human-readable report to stdout.
pub fn print_report(value: &Value) {
    print!("{}", render_report(value));
}

/// Prices to 2 dp, durations and weights to 4 dp.
pub fn render_report(value: &Value) -> String {
    let result = value.get("result").unwrap_or(value);
    let mut out = String::new();

    if let (Some(treasury), Some(mortgage)) = (result.get("treasury"), result.get("mortgage")) {
        write_parameters(&mut out, result.get("parameters"));
        for bond in [treasury, mortgage] {
            write_bond(&mut out, bond);
        }
    } else if result.get("total_present_value").is_some() {
        write_metrics(&mut out, result);
    } else if let Some(Value::Array(rows)) = result.get("periods") {
        write_schedule(&mut out, result, rows);
    } else {
        let _ = writeln!(out, "{result}");
    }

    if let Some(Value::String(path)) = value.get("chart") {
        let _ = writeln!(out, "\nChart saved to {path}");
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            let _ = writeln!(out, "\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                let _ = writeln!(out, "  - {w}");
            }
        }
    }

    out
}

fn money(value: Option<&Value>) -> String {
    value
        .and_then(decimal_field)
        .map(|d| format!("${}", format_thousands(d, 2)))
        .unwrap_or_else(|| "n/a".into())
}

fn fixed4(value: Option<&Value>) -> String {
    value
        .and_then(decimal_field)
        .map(|d| format!("{:.4}", d.round_dp(4)))
        .unwrap_or_else(|| "n/a".into())
}

fn write_parameters(out: &mut String, params: Option<&Value>) {
    let Some(params) = params else {
        return;
    };
    let maturity = params.get("maturity").and_then(Value::as_u64).unwrap_or(0);
    let pct = |key: &str| {
        params
            .get(key)
            .and_then(decimal_field)
            .map(|r| format!("{:.2}%", (r * Decimal::ONE_HUNDRED).round_dp(2)))
            .unwrap_or_else(|| "n/a".into())
    };

    let _ = writeln!(out, "Bond Duration Analysis");
    let _ = writeln!(
        out,
        "  Maturity {maturity} periods | Yield {} | Face {} | Coupon {}",
        pct("yield_rate"),
        money(params.get("face_value")),
        pct("coupon_rate"),
    );
}

fn write_bond(out: &mut String, bond: &Value) {
    let name = bond.get("name").and_then(Value::as_str).unwrap_or("Bond");
    let metrics = bond.get("metrics");

    let _ = writeln!(out, "\n{name}");
    let _ = writeln!(
        out,
        "  Price:    {}",
        money(metrics.and_then(|m| m.get("total_present_value")))
    );
    let _ = writeln!(
        out,
        "  Duration: {} periods",
        fixed4(metrics.and_then(|m| m.get("duration")))
    );
}

fn write_metrics(out: &mut String, result: &Value) {
    let _ = writeln!(out, "Price:    {}", money(result.get("total_present_value")));
    let _ = writeln!(out, "Duration: {} periods", fixed4(result.get("duration")));

    if let Some(Value::Array(rows)) = result.get("periods") {
        let _ = writeln!(
            out,
            "\n{:>6}  {:>18}  {:>18}  {:>8}",
            "Period", "Cash Flow", "Present Value", "Weight"
        );
        for row in rows {
            let _ = writeln!(
                out,
                "{:>6}  {:>18}  {:>18}  {:>8}",
                row.get("period").and_then(Value::as_u64).unwrap_or(0),
                money(row.get("cash_flow")),
                money(row.get("present_value")),
                fixed4(row.get("weight")),
            );
        }
    }
}

fn write_schedule(out: &mut String, result: &Value, rows: &[Value]) {
    let policy = result.get("policy").and_then(Value::as_str).unwrap_or("");
    let _ = writeln!(out, "Cash flows ({policy})");
    for row in rows {
        let _ = writeln!(
            out,
            "{:>6}  {:>18}",
            row.get("period").and_then(Value::as_u64).unwrap_or(0),
            money(row.get("cash_flow")),
        );
    }
    let _ = writeln!(out, "{:>6}  {:>18}", "Total", money(result.get("total")));
}
