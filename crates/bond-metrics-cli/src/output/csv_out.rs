use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) -> Result<(), csv::Error> {
    let stdout = io::stdout();
    write_csv_to(stdout.lock(), value)
}

/// Write output as CSV and flush, surfacing the first write error.
fn write_csv_to<W: io::Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    write_csv(&mut wtr, value)?;
    wtr.flush()?;
    Ok(())
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> Result<(), csv::Error> {
    let result = value.get("result").unwrap_or(value);

    if let (Some(treasury), Some(mortgage)) = (result.get("treasury"), result.get("mortgage")) {
        // One row per bond and period
        wtr.write_record(["bond", "period", "cash_flow", "present_value", "weight"])?;
        for bond in [treasury, mortgage] {
            write_bond_rows(wtr, bond)?;
        }
    } else if let Some(Value::Array(rows)) = result.get("periods") {
        write_array_csv(wtr, rows)?;
    } else if let Value::Object(map) = result {
        wtr.write_record(["field", "value"])?;
        for (key, val) in map {
            wtr.write_record([key.as_str(), &format_csv_value(val)])?;
        }
    } else {
        wtr.write_record([&format_csv_value(result)])?;
    }
    Ok(())
}

fn write_bond_rows<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    bond: &Value,
) -> Result<(), csv::Error> {
    let name = bond.get("name").map(format_csv_value).unwrap_or_default();
    let column = |v: Option<&Value>| v.and_then(Value::as_array).cloned().unwrap_or_default();

    let cash_flows = column(bond.get("cash_flows"));
    let metrics = bond.get("metrics");
    let pvs = column(metrics.and_then(|m| m.get("period_present_values")));
    let weights = column(metrics.and_then(|m| m.get("weights")));

    for (i, cf) in cash_flows.iter().enumerate() {
        let cell = |col: &[Value]| col.get(i).map(format_csv_value).unwrap_or_default();
        wtr.write_record([
            name.clone(),
            (i + 1).to_string(),
            format_csv_value(cf),
            cell(&pvs),
            cell(&weights),
        ])?;
    }
    Ok(())
}

fn write_array_csv<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    arr: &[Value],
) -> Result<(), csv::Error> {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
