//! Pie-chart series for the loan breakdown.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::LoanResult;
use crate::types::Money;

/// Slice colours, in series order: fees, study interest, EMI interest.
pub const PALETTE: [&str; 3] = ["#4f46e5", "#16a34a", "#f97316"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: Money,
    pub color: String,
    /// Share of the whole pie, in percent (0 when the pie is empty).
    pub share_percent: Decimal,
}

/// Three-slice breakdown of what the borrower pays: the fees themselves,
/// interest accrued while studying and interest paid through EMIs.
pub fn chart_series(result: &LoanResult) -> Vec<ChartSlice> {
    let slices = [
        ("Fees", result.total_principal),
        ("Study Interest", result.total_interest_during_study),
        ("EMI Interest", result.total_emi_interest),
    ];
    let total = slices
        .iter()
        .try_fold(Decimal::ZERO, |acc, (_, value)| acc.checked_add(*value))
        .unwrap_or(Decimal::MAX);

    slices
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| ChartSlice {
            name: name.to_string(),
            value,
            color: PALETTE[i % PALETTE.len()].to_string(),
            share_percent: if total.is_zero() {
                Decimal::ZERO
            } else {
                (value / total * dec!(100)).round_dp(2)
            },
        })
        .collect()
}
