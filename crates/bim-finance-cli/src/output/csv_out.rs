use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(reports)) = map.get("result") {
                write_record_csv(&mut wtr, reports);
            } else if let Some(Value::Object(result)) = map.get("result") {
                if let Some(Value::Array(flows)) = result.get("flows") {
                    write_flow_csv(&mut wtr, flows);
                } else {
                    write_field_value_csv(&mut wtr, result);
                }
            } else if let Some(Value::Array(flows)) = map.get("flows") {
                write_flow_csv(&mut wtr, flows);
            } else if let Some(Value::Object(curve)) = map.get("curve") {
                if let Some(Value::Array(points)) = curve.get("points") {
                    write_record_csv(&mut wtr, points);
                }
            } else {
                write_field_value_csv(&mut wtr, map);
            }
        }
        Value::Array(arr) => write_record_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_field_value_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_flow_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, flows: &[Value]) {
    let _ = wtr.write_record(["year", "flow"]);
    for (year, flow) in flows.iter().enumerate() {
        let _ = wtr.write_record([&year.to_string(), &format_csv_value(flow)]);
    }
}

fn write_record_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
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
