//! Education loan amortisation.
//!
//! Each year's fee is disbursed as a separate tranche that accrues simple
//! interest until the course ends. The principal plus that study-period
//! interest is capitalised and repaid as a level monthly instalment (EMI).
//! All math in `rust_decimal::Decimal`.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EduLoanError;
use crate::time_value::{level_payment, percent_to_rate, simple_interest};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::EduLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Highest accepted annual rate, in percent.
pub const MAX_RATE_PERCENT: Decimal = dec!(100);

/// Longest accepted repayment term, in years.
pub const MAX_REPAYMENT_YEARS: u32 = 50;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Fee per study year, in order. `None` marks an unset entry.
    pub fees: Vec<Option<Money>>,
    /// Annual interest rate in percent (10 = 10%).
    pub rate_percent: Rate,
    /// Repayment term in whole years.
    pub repayment_years: u32,
}

/// One disbursed tranche and the interest it accrues before repayment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disbursement {
    /// 0-based index among the surviving (positive) fee entries.
    pub period: u32,
    pub amount: Money,
    /// Periods remaining until the course ends, counting this one.
    pub periods_accruing: u32,
    pub interest_accrued: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub total_principal: Money,
    pub total_interest_during_study: Money,
    /// Capitalised principal entering repayment.
    pub total_loan: Money,
    pub emi: Money,
    pub total_repayment: Money,
    pub total_emi_interest: Money,
    pub total_interest: Money,
    /// Number of positive fee entries.
    pub course_duration: u32,
    pub repayment_months: u32,
    pub disbursements: Vec<Disbursement>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the loan calculation and wrap it in the standard output envelope.
pub fn calculate_loan(input: &LoanInput) -> EduLoanResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for (i, fee) in input.fees.iter().enumerate() {
        if let Some(amount) = fee {
            if *amount < Decimal::ZERO {
                warn!("excluding negative fee {amount} at entry {i}");
                warnings.push(format!(
                    "Fee entry {} is negative ({amount}); excluded from the calculation.",
                    i + 1
                ));
            }
        }
    }

    let result = compute(&input.fees, input.rate_percent, input.repayment_years)?;

    if result.course_duration == 0 {
        warnings.push("No positive fee entries; all loan figures are zero.".into());
    }
    if input.rate_percent.is_zero() {
        warnings.push("Interest rate is zero; EMI is straight-line repayment.".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "study_interest": "simple interest per tranche for (course_duration - period) years",
        "emi": "level monthly payment on the capitalised loan",
        "monthly_rate": "annual rate / 12",
        "zero_rate_fallback": "total_loan / months",
    });

    Ok(with_metadata(
        "Education loan: tranche-wise simple study interest, capitalised, amortised by EMI",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// Compute a [`LoanResult`] from a fee schedule, an annual rate in percent
/// and a repayment term in years.
///
/// Unset, zero and negative fee entries are skipped. They do not count as
/// study periods.
pub fn compute(
    fees: &[Option<Money>],
    rate_percent: Rate,
    repayment_years: u32,
) -> EduLoanResult<LoanResult> {
    validate_parameters(rate_percent, repayment_years)?;

    let annual_rate = percent_to_rate(rate_percent);
    let surviving: Vec<Money> = fees
        .iter()
        .flatten()
        .copied()
        .filter(|amount| *amount > Decimal::ZERO)
        .collect();
    let course_duration = surviving.len() as u32;

    let disbursements: Vec<Disbursement> = surviving
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            let periods_accruing = course_duration - i as u32;
            let interest_accrued = simple_interest(*amount, annual_rate, periods_accruing)
                .ok_or_else(|| out_of_range("study interest"))?;
            Ok(Disbursement {
                period: i as u32,
                amount: *amount,
                periods_accruing,
                interest_accrued,
            })
        })
        .collect::<EduLoanResult<_>>()?;

    let total_principal = checked_sum(disbursements.iter().map(|d| d.amount))
        .ok_or_else(|| out_of_range("total principal"))?;
    let total_interest_during_study =
        checked_sum(disbursements.iter().map(|d| d.interest_accrued))
            .ok_or_else(|| out_of_range("study interest"))?;
    let total_loan = total_principal
        .checked_add(total_interest_during_study)
        .ok_or_else(|| out_of_range("total loan"))?;

    let repayment_months = repayment_years * MONTHS_PER_YEAR;
    let monthly_rate = annual_rate / Decimal::from(MONTHS_PER_YEAR);
    let emi = level_payment(total_loan, monthly_rate, repayment_months)
        .map_err(|e| match e {
            EduLoanError::InvalidInput { .. } => out_of_range("EMI"),
            other => other,
        })?;

    let total_repayment = emi
        .checked_mul(Decimal::from(repayment_months))
        .ok_or_else(|| out_of_range("total repayment"))?;
    let total_emi_interest = total_repayment - total_loan;
    let total_interest = total_interest_during_study
        .checked_add(total_emi_interest)
        .ok_or_else(|| out_of_range("total interest"))?;

    debug!(
        "loan computed: {course_duration} study periods, {repayment_months} months, emi {}",
        emi.round_dp(2)
    );

    Ok(LoanResult {
        total_principal,
        total_interest_during_study,
        total_loan,
        emi,
        total_repayment,
        total_emi_interest,
        total_interest,
        course_duration,
        repayment_months,
        disbursements,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn checked_sum(values: impl Iterator<Item = Money>) -> Option<Money> {
    values.fold(Some(Decimal::ZERO), |acc, v| acc?.checked_add(v))
}

/// Overflow while computing `what`; only oversized fees can get here once
/// rate and term have passed validation.
fn out_of_range(what: &str) -> EduLoanError {
    warn!("{what} overflowed the Decimal range");
    EduLoanError::invalid(
        "fees",
        format!("Fee amounts are too large to compute the {what}."),
    )
}

fn validate_parameters(rate_percent: Rate, repayment_years: u32) -> EduLoanResult<()> {
    if rate_percent < Decimal::ZERO {
        return Err(EduLoanError::invalid(
            "rate_percent",
            "Interest rate cannot be negative.",
        ));
    }
    if rate_percent > MAX_RATE_PERCENT {
        return Err(EduLoanError::invalid(
            "rate_percent",
            format!("Interest rate must not exceed {MAX_RATE_PERCENT}%."),
        ));
    }
    if repayment_years == 0 {
        return Err(EduLoanError::invalid(
            "repayment_years",
            "Repayment duration must be at least one year.",
        ));
    }
    if repayment_years > MAX_REPAYMENT_YEARS {
        return Err(EduLoanError::invalid(
            "repayment_years",
            format!("Repayment duration must not exceed {MAX_REPAYMENT_YEARS} years."),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
