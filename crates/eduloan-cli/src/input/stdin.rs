use eduloan_core::input::FormDocument;
use std::io::{self, Read};

/// Read a piped form document from stdin.
///
/// YAML is a superset of JSON, so both are accepted. Returns None when
/// stdin is a terminal or the pipe is empty.
pub fn read_form_document() -> Result<Option<FormDocument>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let document: FormDocument = serde_yaml::from_str(trimmed)
        .map_err(|e| format!("Failed to parse form from stdin: {e}"))?;
    Ok(Some(document))
}
