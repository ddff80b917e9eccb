use clap::Args;
use serde_json::{json, Value};

use eduloan_core::amortization::LoanResult;
use eduloan_core::chart::chart_series;
use eduloan_core::input::{FormDocument, LoanForm};
use eduloan_core::summary::summary_rows;
use eduloan_core::types::{ComputationOutput, FEE_PERIODS};

use crate::input;

/// Form inputs shared by calculate, chart and export
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormArgs {
    /// Path to JSON or YAML form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Yearly fee, in order; repeat for each year (up to 4). Empty text leaves a year unset
    #[arg(long = "fee", value_name = "AMOUNT")]
    pub fees: Vec<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,

    /// Repayment duration in years
    #[arg(long)]
    pub years: Option<String>,

    /// Copy the first year's fee into the following years (3 or 4)
    #[arg(long, value_parser = clap::value_parser!(u8).range(3..=4))]
    pub same_for: Option<u8>,
}

/// Arguments for the loan calculation
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub form: FormArgs,
}

/// Arguments for the chart series
#[derive(Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub form: FormArgs,
}

/// Build the form from a file, piped stdin, or individual flags.
pub fn load_form(args: &FormArgs) -> Result<LoanForm, Box<dyn std::error::Error>> {
    let document: FormDocument = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(document) = input::stdin::read_form_document()? {
        document
    } else {
        if args.fees.len() > FEE_PERIODS {
            return Err(format!(
                "--fee may be given at most {FEE_PERIODS} times, got {}",
                args.fees.len()
            )
            .into());
        }
        let mut form = LoanForm::default();
        if !args.fees.is_empty() {
            form.reset();
            for (i, fee) in args.fees.iter().enumerate() {
                form.set_fee(i, fee.as_str())?;
            }
        }
        if let Some(ref rate) = args.rate {
            form.set_rate(rate.as_str());
        }
        if let Some(ref years) = args.years {
            form.set_repayment_years(years.as_str());
        }
        if let Some(count) = args.same_for {
            form.apply_uniform_fee(count as usize)?;
        }
        return Ok(form);
    };
    Ok(document.into_form()?)
}

/// Engine envelope plus the table and chart projections of its result.
pub fn calculation_value(
    output: &ComputationOutput<LoanResult>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = serde_json::to_value(output)?;
    if let Value::Object(ref mut map) = value {
        map.insert("summary".into(), serde_json::to_value(summary_rows(&output.result))?);
        map.insert("chart".into(), serde_json::to_value(chart_series(&output.result))?);
    }
    Ok(value)
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut form = load_form(&args.form)?;
    let output = form.calculate()?;
    calculation_value(output)
}

pub fn run_chart(args: ChartArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut form = load_form(&args.form)?;
    let output = form.calculate()?;
    Ok(json!({ "results": chart_series(&output.result) }))
}
