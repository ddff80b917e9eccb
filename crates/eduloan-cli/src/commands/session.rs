use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use eduloan_core::export::DEFAULT_FILE_NAME;
use eduloan_core::input::{fee_label, LoanForm};
use eduloan_core::preferences::Theme;

use super::calculate::calculation_value;
use super::export::export_form;
use crate::output;
use crate::OutputFormat;

const HELP: &str = "\
commands:
  fee <year> [amount]   set the fee for year 1-4 (no amount clears it)
  same <3|4>            copy year 1's fee into the following years
  rate <percent>        annual interest rate
  years <n>             repayment duration
  calc                  calculate and show the summary
  show                  show the current inputs and last result
  reset                 clear all fees and restore defaults
  export [path]         save the last result as a PDF
  help                  this text
  quit                  leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Fee { index: usize, value: String },
    Same(usize),
    Rate(String),
    Years(String),
    Calc,
    Show,
    Reset,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        "fee" => {
            let (year, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let year: usize = year
                .parse()
                .map_err(|_| format!("fee expects a year number, got '{year}'"))?;
            if year == 0 {
                return Err("years are numbered from 1".into());
            }
            SessionCommand::Fee {
                index: year - 1,
                value: value.trim().to_string(),
            }
        }
        "same" => match rest.parse::<usize>() {
            Ok(count @ 3..=4) => SessionCommand::Same(count),
            _ => return Err(format!("same expects 3 or 4, got '{rest}'")),
        },
        "rate" => SessionCommand::Rate(rest.to_string()),
        "years" => SessionCommand::Years(rest.to_string()),
        "calc" | "calculate" => SessionCommand::Calc,
        "show" => SessionCommand::Show,
        "reset" | "clear" => SessionCommand::Reset,
        "export" => SessionCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

/// Drive a [`LoanForm`] from line commands on stdin until `quit` or EOF.
///
/// Errors are reported and the session continues; a failed command never
/// changes the form.
pub fn run_session(format: &OutputFormat, theme: Theme) -> Result<(), Box<dyn std::error::Error>> {
    let mut form = LoanForm::with_initial_calculation()?;
    let interactive = atty::is(atty::Stream::Stdin);

    if interactive {
        println!("Education loan calculator. Type 'help' for commands.");
    }
    show(&form, format, theme)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else { break };
        let line = line?;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                report(&e);
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        if let Err(e) = apply(&mut form, command, format, theme) {
            report(&e.to_string());
        }
    }
    Ok(())
}

fn apply(
    form: &mut LoanForm,
    command: SessionCommand,
    format: &OutputFormat,
    theme: Theme,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        SessionCommand::Fee { index, value } => {
            form.set_fee(index, value)?;
            let label = fee_label(index);
            let entry = form.fees().get(index).unwrap_or_default();
            println!("{label}: {}", if entry.is_empty() { "(empty)" } else { entry });
        }
        SessionCommand::Same(count) => {
            form.apply_uniform_fee(count)?;
            println!("Same fee for {count} years: {}", form.fees().entries().join(", "));
        }
        SessionCommand::Rate(rate) => form.set_rate(rate),
        SessionCommand::Years(years) => form.set_repayment_years(years),
        SessionCommand::Calc => {
            let output = form.calculate()?;
            output::format_output(format, &calculation_value(output)?, theme);
        }
        SessionCommand::Show => show(form, format, theme)?,
        SessionCommand::Reset => {
            form.reset();
            println!("Cleared.");
        }
        SessionCommand::Export(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
            export_form(form, &path)?;
            println!("Saved {}", path.display());
        }
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
    Ok(())
}

fn show(form: &LoanForm, format: &OutputFormat, theme: Theme) -> Result<(), Box<dyn std::error::Error>> {
    for (i, fee) in form.fees().entries().iter().enumerate() {
        println!("{}: {}", fee_label(i), if fee.is_empty() { "(empty)" } else { fee });
    }
    println!("Interest rate: {}%", form.rate());
    println!("Repayment: {} years", form.repayment_years());

    match form.output() {
        Some(output) => output::format_output(format, &calculation_value(output)?, theme),
        None => println!("No result yet; run 'calc'."),
    }
    Ok(())
}

fn report(message: &str) {
    eprintln!("{}: {}", "error".red().bold(), message);
}
