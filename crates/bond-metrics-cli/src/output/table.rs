use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{decimal_field, format_thousands};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let (Some(treasury), Some(mortgage)) = (result.get("treasury"), result.get("mortgage")) {
        println!("{}", bond_summary_table(&[treasury, mortgage]));
    } else if let Some(Value::Array(rows)) = result.get("periods") {
        print_scalar_fields(result);
        print_array_table(rows);
    } else {
        print_scalar_fields(result);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn bond_summary_table(bonds: &[&Value]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Bond", "Policy", "Periods", "Price", "Duration"]);
    for bond in bonds {
        let metrics = bond.get("metrics");
        let periods = bond
            .get("cash_flows")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let price = metrics
            .and_then(|m| m.get("total_present_value"))
            .and_then(decimal_field)
            .map(|d| format_thousands(d, 2))
            .unwrap_or_default();
        let duration = metrics
            .and_then(|m| m.get("duration"))
            .and_then(decimal_field)
            .map(|d| format!("{:.4}", d.round_dp(4)))
            .unwrap_or_default();
        builder.push_record([
            format_value(bond.get("name").unwrap_or(&Value::Null)),
            format_value(bond.get("policy").unwrap_or(&Value::Null)),
            periods.to_string(),
            price,
            duration,
        ]);
    }
    Table::from(builder)
}

/// Field/value table of every non-array entry.
fn print_scalar_fields(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map.iter().filter(|(_, v)| !v.is_array()) {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
