use colored::{ColoredString, Colorize};
use eduloan_core::preferences::Theme;
use eduloan_core::summary::format_inr;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value, theme: Theme) {
    match value {
        Value::Object(map) if map.contains_key("summary") => print_loan_report(map, theme),
        Value::Object(map) => {
            if let Some(Value::Array(results)) = map.get("results") {
                print_array_table(results);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", scalar_text(value)),
    }
}

fn heading(text: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => text.blue().bold(),
        Theme::Dark => text.bright_cyan().bold(),
    }
}

/// Summary rows, chart series and per-year breakdown of one calculation.
fn print_loan_report(envelope: &Map<String, Value>, theme: Theme) {
    if let Some(Value::Array(rows)) = envelope.get("summary") {
        println!("{}", heading("Loan Summary", theme));
        let mut builder = Builder::default();
        builder.push_record(["Item", "Amount"]);
        for row in rows {
            builder.push_record([field(row, "label"), field(row, "formatted")]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Array(slices)) = envelope.get("chart") {
        println!("\n{}", heading("Breakdown", theme));
        let mut builder = Builder::default();
        builder.push_record(["Slice", "Amount", "Share", "Colour"]);
        for slice in slices {
            builder.push_record([
                field(slice, "name"),
                money(slice.get("value")),
                format!("{}%", field(slice, "share_percent")),
                field(slice, "color"),
            ]);
        }
        println!("{}", Table::from(builder));
    }

    let disbursements = envelope
        .get("result")
        .and_then(|r| r.get("disbursements"))
        .and_then(Value::as_array)
        .filter(|d| !d.is_empty());
    if let Some(disbursements) = disbursements {
        println!("\n{}", heading("Study Period", theme));
        let mut builder = Builder::default();
        builder.push_record(["Year", "Fee", "Years Accruing", "Interest"]);
        for d in disbursements {
            let year = d
                .get("period")
                .and_then(Value::as_u64)
                .map(|p| (p + 1).to_string())
                .unwrap_or_default();
            builder.push_record([
                year,
                money(d.get("amount")),
                field(d, "periods_accruing"),
                money(d.get("interest_accrued")),
            ]);
        }
        println!("{}", Table::from(builder));
    }

    print_warnings(envelope);
}

fn print_warnings(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), scalar_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(empty)");
        }
        for item in arr {
            println!("{}", scalar_text(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn field(value: &Value, key: &str) -> String {
    value.get(key).map(scalar_text).unwrap_or_default()
}

/// Decimal-string amounts are shown as rupees.
fn money(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => Decimal::from_str(s)
            .map(format_inr)
            .unwrap_or_else(|_| s.clone()),
        Some(other) => scalar_text(other),
        None => String::new(),
    }
}
