use napi::Result as NapiResult;
use napi_derive::napi;
use std::str::FromStr;

use eduloan_core::amortization::{self, LoanInput, LoanResult};
use eduloan_core::input::FormDocument;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortisation
// ---------------------------------------------------------------------------

/// Engine input with decimal fees: `{ fees, rate_percent, repayment_years }`.
#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Raw form contents as typed by the user; runs the same normalisation as the CLI.
#[napi]
pub fn calculate_form(form_json: String) -> NapiResult<String> {
    let document: FormDocument = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let mut form = document.into_form().map_err(to_napi_error)?;
    let output = form.calculate().map_err(to_napi_error)?;
    serde_json::to_string(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

#[napi]
pub fn chart_series(result_json: String) -> NapiResult<String> {
    let result: LoanResult = serde_json::from_str(&result_json).map_err(to_napi_error)?;
    serde_json::to_string(&eduloan_core::chart::chart_series(&result)).map_err(to_napi_error)
}

#[napi]
pub fn summary_rows(result_json: String) -> NapiResult<String> {
    let result: LoanResult = serde_json::from_str(&result_json).map_err(to_napi_error)?;
    serde_json::to_string(&eduloan_core::summary::summary_rows(&result)).map_err(to_napi_error)
}

/// Format a decimal string as rupees, e.g. "1610000" -> "₹16,10,000.00".
#[napi]
pub fn format_inr(amount: String) -> NapiResult<String> {
    let value = rust_decimal::Decimal::from_str(amount.trim()).map_err(to_napi_error)?;
    Ok(eduloan_core::summary::format_inr(value))
}
