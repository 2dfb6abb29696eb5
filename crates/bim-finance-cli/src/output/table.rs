use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
///
/// Envelope objects render their `result` section; cash-flow series and
/// sensitivity curves get year/rate-indexed tables instead of a flat
/// field dump.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_section(result);
                print_envelope_trailer(map);
            } else if let Some(Value::Array(flows)) = map.get("flows") {
                print_flow_series(flows);
            } else {
                print_object_sections(map);
            }
        }
        Value::Array(arr) => print_record_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_section(result: &Value) {
    match result {
        Value::Object(map) => {
            if let Some(Value::Array(flows)) = map.get("flows") {
                print_flow_series(flows);
            } else {
                print_field_value_table(map);
            }
        }
        Value::Array(arr) => print_record_table(arr),
        other => println!("{}", other),
    }
}

/// Warnings and methodology trail the result table.
fn print_envelope_trailer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Top-level objects without an envelope (summary, sensitivity): render
/// each section under its key.
fn print_object_sections(map: &serde_json::Map<String, Value>) {
    for (key, val) in map {
        println!("{}:", key);
        match val {
            Value::Array(arr) => print_record_table(arr),
            Value::Object(inner) => {
                if let Some(Value::Array(points)) = inner.get("points") {
                    print_record_table(points);
                } else {
                    print_field_value_table(inner);
                }
            }
            other => println!("{}", format_value(other)),
        }
        println!();
    }
}

fn print_field_value_table(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

/// A cash-flow series as a Year/Flow table; year 0 is the outlay.
fn print_flow_series(flows: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Year", "Flow"]);
    for (year, flow) in flows.iter().enumerate() {
        builder.push_record([&year.to_string(), &format_value(flow)]);
    }
    println!("{}", Table::from(builder));
}

/// Homogeneous object records (report rows, curve points) under shared
/// headers taken from the first record.
fn print_record_table(arr: &[Value]) {
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
