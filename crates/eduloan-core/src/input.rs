//! Input collection for the calculator form.
//!
//! The form holds raw text exactly as the user typed it. Nothing is
//! validated on edit; numeric coercion and range checks happen once, when
//! [`LoanForm::calculate`] hands the inputs to the amortisation engine.

use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::amortization::{calculate_loan, LoanInput, LoanResult};
use crate::error::EduLoanError;
use crate::types::{ComputationOutput, Money, Rate, FEE_PERIODS};
use crate::EduLoanResult;

pub const DEFAULT_RATE: &str = "10";
pub const DEFAULT_REPAYMENT_YEARS: &str = "10";

/// Fees a fresh form starts with.
pub const SEED_FEES: [&str; FEE_PERIODS] = ["250000", "350000", "350000", "350000"];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a user-entered amount. Empty text is unset.
///
/// Accepts an optional leading `₹` and `,` `_` or space digit grouping,
/// so "₹3,50,000" and "350 000" both read as 350000.
pub fn parse_amount(text: &str) -> EduLoanResult<Option<Money>> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('₹').unwrap_or(trimmed);
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(&cleaned)
        .map(Some)
        .map_err(|_| EduLoanError::invalid("amount", format!("'{text}' is not a number.")))
}

/// Parse an annual rate in percent. A trailing `%` is allowed.
pub fn parse_rate(text: &str) -> EduLoanResult<Rate> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
    match Decimal::from_str(trimmed.trim()) {
        Ok(rate) if rate < Decimal::ZERO => Err(EduLoanError::invalid(
            "rate",
            "Interest rate cannot be negative.",
        )),
        Ok(rate) => Ok(rate),
        Err(_) if trimmed.trim().is_empty() => {
            Err(EduLoanError::invalid("rate", "Interest rate is required."))
        }
        Err(_) => Err(EduLoanError::invalid(
            "rate",
            format!("'{text}' is not a number."),
        )),
    }
}

/// Parse a repayment duration in whole years.
pub fn parse_repayment_years(text: &str) -> EduLoanResult<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EduLoanError::invalid(
            "repayment_years",
            "Repayment duration is required.",
        ));
    }
    trimmed.parse::<u32>().map_err(|_| {
        EduLoanError::invalid(
            "repayment_years",
            format!("'{text}' is not a whole number of years."),
        )
    })
}

/// Display label for a fee entry: "1st Year Fee", "2nd Year Fee", ...
pub fn fee_label(index: usize) -> String {
    let year = index + 1;
    let suffix = match (year % 10, year % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{year}{suffix} Year Fee")
}

// ---------------------------------------------------------------------------
// Fee schedule
// ---------------------------------------------------------------------------

/// Fixed-length list of raw fee entries, one per study year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    entries: [String; FEE_PERIODS],
}

impl FeeSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self {
            entries: SEED_FEES.map(String::from),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) -> EduLoanResult<()> {
        let slot = self.entries.get_mut(index).ok_or_else(|| {
            EduLoanError::invalid(
                "fee_index",
                format!("Fee index {index} is out of range (0..{FEE_PERIODS})."),
            )
        })?;
        *slot = value.into();
        Ok(())
    }

    /// Copy entry 0 into entries `1..period_count`.
    pub fn fill_from_first(&mut self, period_count: usize) -> EduLoanResult<()> {
        if period_count == 0 || period_count > FEE_PERIODS {
            return Err(EduLoanError::invalid(
                "period_count",
                format!("Uniform fee applies to 1..={FEE_PERIODS} years, got {period_count}."),
            ));
        }
        let base = self.entries[0].clone();
        for entry in &mut self.entries[1..period_count] {
            entry.clone_from(&base);
        }
        Ok(())
    }

    /// Parse every entry. Non-numeric text becomes unset and yields a warning.
    pub fn parse(&self) -> (Vec<Option<Money>>, Vec<String>) {
        let mut warnings = Vec::new();
        let amounts = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, text)| match parse_amount(text) {
                Ok(amount) => amount,
                Err(_) => {
                    warn!("ignoring non-numeric fee '{text}' at entry {i}");
                    warnings.push(format!(
                        "{} '{}' is not a number; treated as empty.",
                        fee_label(i),
                        text.trim()
                    ));
                    None
                }
            })
            .collect();
        (amounts, warnings)
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Mutable calculator form plus the last computed result.
#[derive(Debug, Clone)]
pub struct LoanForm {
    fees: FeeSchedule,
    rate: String,
    repayment_years: String,
    output: Option<ComputationOutput<LoanResult>>,
    same_for_3_years: bool,
    same_for_4_years: bool,
}

impl Default for LoanForm {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::seeded(),
            rate: DEFAULT_RATE.into(),
            repayment_years: DEFAULT_REPAYMENT_YEARS.into(),
            output: None,
            same_for_3_years: false,
            same_for_4_years: false,
        }
    }
}

impl LoanForm {
    /// A seeded form with its first calculation already run.
    pub fn with_initial_calculation() -> EduLoanResult<Self> {
        let mut form = Self::default();
        form.calculate()?;
        Ok(form)
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    pub fn rate(&self) -> &str {
        &self.rate
    }

    pub fn repayment_years(&self) -> &str {
        &self.repayment_years
    }

    pub fn result(&self) -> Option<&LoanResult> {
        self.output.as_ref().map(|o| &o.result)
    }

    pub fn output(&self) -> Option<&ComputationOutput<LoanResult>> {
        self.output.as_ref()
    }

    pub fn same_for_3_years(&self) -> bool {
        self.same_for_3_years
    }

    pub fn same_for_4_years(&self) -> bool {
        self.same_for_4_years
    }

    pub fn set_fee(&mut self, index: usize, value: impl Into<String>) -> EduLoanResult<()> {
        self.fees.set(index, value)
    }

    pub fn set_rate(&mut self, value: impl Into<String>) {
        self.rate = value.into();
    }

    pub fn set_repayment_years(&mut self, value: impl Into<String>) {
        self.repayment_years = value.into();
    }

    /// Copy the first year's fee into the following years up to `period_count`.
    pub fn apply_uniform_fee(&mut self, period_count: usize) -> EduLoanResult<()> {
        self.fees.fill_from_first(period_count)?;
        match period_count {
            3 => self.same_for_3_years = true,
            4 => self.same_for_4_years = true,
            _ => {}
        }
        Ok(())
    }

    /// Clear every fee, restore rate and duration defaults, drop the result.
    pub fn reset(&mut self) {
        self.fees = FeeSchedule::empty();
        self.rate = DEFAULT_RATE.into();
        self.repayment_years = DEFAULT_REPAYMENT_YEARS.into();
        self.output = None;
        self.same_for_3_years = false;
        self.same_for_4_years = false;
    }

    /// Normalise the raw inputs into an engine input.
    ///
    /// Returns the fee-parsing warnings alongside.
    pub fn to_loan_input(&self) -> EduLoanResult<(LoanInput, Vec<String>)> {
        let rate_percent = parse_rate(&self.rate)?;
        let repayment_years = parse_repayment_years(&self.repayment_years)?;
        let (fees, warnings) = self.fees.parse();
        Ok((
            LoanInput {
                fees,
                rate_percent,
                repayment_years,
            },
            warnings,
        ))
    }

    /// Run the engine and replace the stored result.
    ///
    /// On error the previous result stays in place.
    pub fn calculate(&mut self) -> EduLoanResult<&ComputationOutput<LoanResult>> {
        let (input, mut warnings) = self.to_loan_input()?;
        let mut output = calculate_loan(&input)?;
        warnings.append(&mut output.warnings);
        output.warnings = warnings;
        let stored = self.output.insert(output);
        Ok(&*stored)
    }
}

// ---------------------------------------------------------------------------
// Form documents
// ---------------------------------------------------------------------------

/// A single form value as it appears in a JSON or YAML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl RawEntry {
    pub fn into_text(self) -> String {
        match self {
            RawEntry::Text(s) => s,
            RawEntry::Integer(n) => n.to_string(),
            RawEntry::Float(f) => f.to_string(),
        }
    }
}

/// Serialised form contents. Missing fields keep the seed defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<Vec<Option<RawEntry>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<RawEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repayment_years: Option<RawEntry>,
    /// Apply the uniform-fee shortcut for this many years after loading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_for: Option<usize>,
}

impl FormDocument {
    pub fn into_form(self) -> EduLoanResult<LoanForm> {
        let mut form = LoanForm::default();
        if let Some(fees) = self.fees {
            if fees.len() > FEE_PERIODS {
                return Err(EduLoanError::invalid(
                    "fees",
                    format!("At most {FEE_PERIODS} fee entries are supported, got {}.", fees.len()),
                ));
            }
            form.fees = FeeSchedule::empty();
            for (i, fee) in fees.into_iter().enumerate() {
                form.set_fee(i, fee.map(RawEntry::into_text).unwrap_or_default())?;
            }
        }
        if let Some(rate) = self.rate {
            form.set_rate(rate.into_text());
        }
        if let Some(years) = self.repayment_years {
            form.set_repayment_years(years.into_text());
        }
        if let Some(count) = self.same_for {
            form.apply_uniform_fee(count)?;
        }
        Ok(form)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("").unwrap(), None);
        assert_eq!(parse_amount("   ").unwrap(), None);
        assert_eq!(parse_amount("250000").unwrap(), Some(dec!(250_000)));
        assert_eq!(parse_amount("₹3,50,000").unwrap(), Some(dec!(350_000)));
        assert_eq!(parse_amount(" 1_000.50 ").unwrap(), Some(dec!(1000.50)));
        assert_eq!(parse_amount("-5").unwrap(), Some(dec!(-5)));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("10").unwrap(), dec!(10));
        assert_eq!(parse_rate("8.5%").unwrap(), dec!(8.5));
        assert!(parse_rate("-1").is_err());
        assert!(parse_rate("").is_err());
        assert!(parse_rate("ten").is_err());
    }

    #[test]
    fn test_parse_repayment_years() {
        assert_eq!(parse_repayment_years(" 10 ").unwrap(), 10);
        assert!(parse_repayment_years("10.5").is_err());
        assert!(parse_repayment_years("-2").is_err());
        assert!(parse_repayment_years("").is_err());
    }

    #[test]
    fn test_fee_labels() {
        assert_eq!(fee_label(0), "1st Year Fee");
        assert_eq!(fee_label(1), "2nd Year Fee");
        assert_eq!(fee_label(2), "3rd Year Fee");
        assert_eq!(fee_label(3), "4th Year Fee");
        assert_eq!(fee_label(10), "11th Year Fee");
    }

    #[test]
    fn test_set_fee_out_of_range_leaves_state() {
        let mut form = LoanForm::default();
        let before = form.fees().clone();
        assert!(form.set_fee(4, "1").is_err());
        assert_eq!(form.fees(), &before);
    }

    #[test]
    fn test_uniform_fee_three_years() {
        let mut form = LoanForm::default();
        form.set_fee(0, "100000").unwrap();
        form.set_fee(3, "999").unwrap();
        form.apply_uniform_fee(3).unwrap();
        assert_eq!(form.fees().entries(), ["100000", "100000", "100000", "999"]);
        assert!(form.same_for_3_years());
        assert!(!form.same_for_4_years());
    }

    #[test]
    fn test_uniform_fee_four_years() {
        let mut form = LoanForm::default();
        form.set_fee(0, "100000").unwrap();
        form.apply_uniform_fee(4).unwrap();
        assert_eq!(form.fees().entries(), ["100000"; 4]);
        assert!(form.same_for_4_years());
    }

    #[test]
    fn test_uniform_fee_from_unset_first_entry() {
        let mut form = LoanForm::default();
        form.set_fee(0, "").unwrap();
        form.apply_uniform_fee(4).unwrap();
        assert!(form.fees().entries().iter().all(String::is_empty));
    }

    #[test]
    fn test_uniform_fee_bad_count() {
        let mut form = LoanForm::default();
        assert!(form.apply_uniform_fee(0).is_err());
        assert!(form.apply_uniform_fee(5).is_err());
    }

    #[test]
    fn test_reset() {
        let mut form = LoanForm::with_initial_calculation().unwrap();
        form.set_rate("12");
        form.set_repayment_years("7");
        form.apply_uniform_fee(4).unwrap();
        form.reset();

        assert!(form.fees().entries().iter().all(String::is_empty));
        assert_eq!(form.rate(), "10");
        assert_eq!(form.repayment_years(), "10");
        assert!(form.result().is_none());
        assert!(!form.same_for_3_years());
        assert!(!form.same_for_4_years());
    }

    #[test]
    fn test_initial_calculation_uses_seed() {
        let form = LoanForm::with_initial_calculation().unwrap();
        let result = form.result().unwrap();
        assert_eq!(result.total_principal, dec!(1_300_000));
        assert_eq!(result.total_loan, dec!(1_610_000));
    }

    #[test]
    fn test_calculate_failure_keeps_previous_result() {
        let mut form = LoanForm::with_initial_calculation().unwrap();
        let before = form.result().cloned();
        form.set_rate("abc");
        assert!(form.calculate().is_err());
        assert_eq!(form.result().cloned(), before);
    }

    #[test]
    fn test_non_numeric_fee_warns_and_is_skipped() {
        let mut form = LoanForm::default();
        form.set_fee(1, "lots").unwrap();
        let output = form.calculate().unwrap();
        assert_eq!(output.result.course_duration, 3);
        assert!(output.warnings.iter().any(|w| w.contains("2nd Year Fee")));
    }

    #[test]
    fn test_form_document_defaults_and_overrides() {
        let doc: FormDocument = serde_json::from_str(
            r#"{ "fees": [200000, null, "₹2,00,000"], "rate": 9.5, "same_for": 3 }"#,
        )
        .unwrap();
        let form = doc.into_form().unwrap();
        assert_eq!(form.fees().entries(), ["200000", "200000", "200000", ""]);
        assert_eq!(form.rate(), "9.5");
        assert_eq!(form.repayment_years(), "10");
        assert!(form.same_for_3_years());
    }

    #[test]
    fn test_form_document_too_many_fees() {
        let doc: FormDocument =
            serde_json::from_str(r#"{ "fees": ["1", "2", "3", "4", "5"] }"#).unwrap();
        assert!(doc.into_form().is_err());
    }
}
