use chrono::Local;
use clap::Args;
use log::info;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use eduloan_core::export::{save_summary_pdf, DEFAULT_FILE_NAME};
use eduloan_core::input::LoanForm;
use eduloan_core::summary::summary_lines;

use super::calculate::{load_form, FormArgs};

pub const SUMMARY_TITLE: &str = "Loan Summary";

/// Arguments for the PDF export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Where to write the PDF
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    pub out: PathBuf,
}

pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut form = load_form(&args.form)?;
    form.calculate()?;
    export_form(&form, &args.out)
}

/// Write the current result of `form` to `path`. The form is not modified.
pub fn export_form(form: &LoanForm, path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let result = form
        .result()
        .ok_or("nothing to export: calculate the loan first")?;

    let lines = summary_lines(result);
    save_summary_pdf(path, SUMMARY_TITLE, &lines, Local::now().naive_local())?;
    info!("wrote {}", path.display());

    Ok(json!({
        "path": path.display().to_string(),
        "lines": lines.len(),
    }))
}
