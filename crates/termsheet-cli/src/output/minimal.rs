use serde_json::Value;

use super::{format_scalar, row_array};

/// Key output fields, in priority order.
const PRIORITY_KEYS: [&str; 5] = [
    "investor_return",
    "effective_apr",
    "break_even_exit",
    "founder_return",
    "founder_break_even",
];

/// Print just the key answer from the output.
///
/// Row results print one `name: investor / founder` line per row; single
/// results print the first non-null priority field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some((_, rows)) = row_array(map) {
            for row in rows {
                let label = row
                    .get("name")
                    .or_else(|| row.get("exit_valuation"))
                    .map(|v| format_scalar(v, "-"))
                    .unwrap_or_default();
                let investor = row.get("investor_return").map(|v| format_scalar(v, "n/a"));
                let founder = row.get("founder_return").map(|v| format_scalar(v, "n/a"));
                println!(
                    "{}: {} / {}",
                    label,
                    investor.unwrap_or_default(),
                    founder.unwrap_or_default()
                );
            }
            return;
        }

        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", format_scalar(val, "n/a"));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val, "n/a"));
            return;
        }
    }

    println!("{}", format_scalar(result_obj, "n/a"));
}
