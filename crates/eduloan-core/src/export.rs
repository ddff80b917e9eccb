//! Single-page PDF snapshot of the rendered loan summary.
//!
//! Built with `lopdf` on an A4 page using the standard Helvetica fonts in
//! WinAnsi encoding, so no font data is embedded. `₹` has no glyph in those
//! fonts and is written as `Rs.`.

use chrono::NaiveDateTime;
use log::{debug, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::EduLoanError;

pub const DEFAULT_FILE_NAME: &str = "loan-summary.pdf";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 11;
const FOOTER_SIZE: i64 = 8;
const LEADING: i64 = 18;

/// Body lines that fit below the title on one page.
const MAX_LINES: usize = ((PAGE_HEIGHT - 2 * MARGIN - 2 * LEADING) / LEADING) as usize;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the summary is empty")]
    EmptySummary,
    #[error("failed to build PDF: {0}")]
    Render(#[from] lopdf::Error),
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
}

impl From<ExportError> for EduLoanError {
    fn from(e: ExportError) -> Self {
        EduLoanError::Export(e.to_string())
    }
}

/// Render `lines` under `title` as a one-page PDF document.
pub fn render_summary_pdf(
    title: &str,
    lines: &[String],
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = summary_document(title, lines, generated_at)?;
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    debug!("rendered summary pdf: {} bytes", bytes.len());
    Ok(bytes)
}

/// Render and write the summary PDF to `path`.
pub fn save_summary_pdf(
    path: &Path,
    title: &str,
    lines: &[String],
    generated_at: NaiveDateTime,
) -> Result<(), ExportError> {
    let mut doc = summary_document(title, lines, generated_at)?;
    doc.save(path)
        .map(|_| ())
        .map_err(|e| ExportError::Write {
            path: path.to_path_buf(),
            source: lopdf::Error::from(e),
        })
}

fn summary_document(
    title: &str,
    lines: &[String],
    generated_at: NaiveDateTime,
) -> Result<Document, ExportError> {
    if lines.is_empty() {
        return Err(ExportError::EmptySummary);
    }
    if lines.len() > MAX_LINES {
        warn!(
            "summary has {} lines; only the first {MAX_LINES} fit on the page",
            lines.len()
        );
    }

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let regular = add_font(&mut doc, "Helvetica");
    let bold = add_font(&mut doc, "Helvetica-Bold");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let content = page_content(title, &lines[..lines.len().min(MAX_LINES)], generated_at);
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(title)),
        "Producer" => Object::string_literal(format!("eduloan {}", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(
            generated_at.format("D:%Y%m%d%H%M%S").to_string(),
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    Ok(doc)
}

fn add_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

fn page_content(title: &str, lines: &[String], generated_at: NaiveDateTime) -> Content {
    let top = PAGE_HEIGHT - MARGIN;
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F2".into(), TITLE_SIZE.into()]),
        Operation::new("Td", vec![MARGIN.into(), top.into()]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(title))]),
        Operation::new("ET", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN.into(), (top - 2 * LEADING).into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(line))]));
    }
    operations.extend([
        Operation::new("ET", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FOOTER_SIZE.into()]),
        Operation::new("Td", vec![MARGIN.into(), MARGIN.into()]),
        Operation::new(
            "Tj",
            vec![Object::string_literal(format!(
                "Generated {}",
                generated_at.format("%Y-%m-%d %H:%M")
            ))],
        ),
        Operation::new("ET", vec![]),
    ]);
    Content { operations }
}

/// Encode text for the WinAnsi base fonts. Latin-1 maps byte for byte.
fn win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => out.extend_from_slice(b"Rs."),
            ' '..='~' | '\u{a0}'..='\u{ff}' => out.push(c as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn lines() -> Vec<String> {
        vec![
            "Total Fees: ₹13,00,000.00".to_string(),
            "Monthly EMI: ₹21,276.27".to_string(),
        ]
    }

    fn shown_text(doc: &Document) -> Vec<String> {
        let pages = doc.get_pages();
        let page_id = *pages.values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_renders_single_page_with_summary_lines() {
        let bytes = render_summary_pdf("Loan Summary", &lines(), timestamp()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        assert_eq!(doc.get_pages().len(), 1);
        let text = shown_text(&doc);
        assert_eq!(text[0], "Loan Summary");
        assert_eq!(text[1], "Total Fees: Rs.13,00,000.00");
        assert_eq!(text[2], "Monthly EMI: Rs.21,276.27");
        assert_eq!(text[3], "Generated 2024-06-01 09:30");
    }

    #[test]
    fn test_creation_date_recorded() {
        let bytes = render_summary_pdf("Loan Summary", &lines(), timestamp()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        assert_eq!(
            info.get(b"CreationDate").unwrap().as_str().unwrap(),
            b"D:20240601093000"
        );
    }

    #[test]
    fn test_overlong_summary_is_cut_to_one_page() {
        let many: Vec<String> = (0..MAX_LINES + 10).map(|i| format!("line {i}")).collect();
        let bytes = render_summary_pdf("Loan Summary", &many, timestamp()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        // title + body + footer
        assert_eq!(shown_text(&doc).len(), MAX_LINES + 2);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(win_ansi("₹5 café ✓"), b"Rs.5 caf\xe9 ?".to_vec());
    }

    #[test]
    fn test_empty_summary_rejected() {
        assert!(matches!(
            render_summary_pdf("Loan Summary", &[], timestamp()),
            Err(ExportError::EmptySummary)
        ));
    }

    #[test]
    fn test_save_to_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(DEFAULT_FILE_NAME);
        let err = save_summary_pdf(&path, "Loan Summary", &lines(), timestamp()).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        let converted: EduLoanError = err.into();
        assert!(matches!(converted, EduLoanError::Export(_)));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE_NAME);
        save_summary_pdf(&path, "Loan Summary", &lines(), timestamp()).unwrap();
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
