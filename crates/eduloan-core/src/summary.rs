//! Currency formatting and the seven-row loan summary shown to the borrower.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::amortization::LoanResult;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Currency formatting
// ---------------------------------------------------------------------------

/// Format an amount as Indian rupees: `₹16,10,000.00`.
///
/// Indian grouping puts a separator after the last three digits and then
/// after every two. Always two fraction digits, half away from zero.
pub fn format_inr(value: Money) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    rounded = rounded.abs();
    rounded.rescale(2);

    let text = rounded.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if negative { "-" } else { "" };
    format!("{sign}₹{}.{fraction}", group_indian(whole))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{last_three}", groups.join(","))
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

/// Colour tag a renderer may use for a summary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
    Orange,
    Pink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: Money,
    pub formatted: String,
    pub accent: Accent,
    /// Only the grand total is emphasised.
    pub emphasized: bool,
}

/// The seven summary rows, in display order.
pub fn summary_rows(result: &LoanResult) -> Vec<SummaryRow> {
    let rows = [
        ("Total Fees", result.total_principal, Accent::Blue),
        ("Interest During Study", result.total_interest_during_study, Accent::Green),
        ("Total Loan Before EMI", result.total_loan, Accent::Yellow),
        ("Monthly EMI", result.emi, Accent::Red),
        ("Total Repayment Amount", result.total_repayment, Accent::Purple),
        ("Total EMI Interest", result.total_emi_interest, Accent::Orange),
        ("Total Interest Paid", result.total_interest, Accent::Pink),
    ];
    let last = rows.len() - 1;
    rows.into_iter()
        .enumerate()
        .map(|(i, (label, value, accent))| SummaryRow {
            label: label.to_string(),
            value,
            formatted: format_inr(value),
            accent,
            emphasized: i == last,
        })
        .collect()
}

/// Plain-text lines of the summary, as captured by the PDF export.
pub fn summary_lines(result: &LoanResult) -> Vec<String> {
    summary_rows(result)
        .into_iter()
        .map(|row| format!("{}: {}", row.label, row.formatted))
        .collect()
}
