use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::scalar_text;

/// Keys that answer "what is the headline number?", in priority order.
const PRIORITY_KEYS: [&str; 4] = ["emi", "theme", "path", "total_loan"];

/// Print just the key answer from the output, e.g. the monthly EMI.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

/// Decimal strings are rounded to cents; everything else prints as-is.
fn format_minimal(value: &Value) -> String {
    if let Value::String(s) = value {
        if let Ok(amount) = Decimal::from_str(s) {
            return amount.round_dp(2).to_string();
        }
    }
    scalar_text(value)
}
