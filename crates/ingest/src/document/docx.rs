use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const BODY_PART: &str = "word/document.xml";

/// Extract the raw text of a `.docx` package, one line per paragraph.
///
/// Only the main body part is read; headers, footers and comments are skipped.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::DocxError(format!("not a DOCX package: {e}")))?;
    let mut part = archive
        .by_name(BODY_PART)
        .map_err(|e| ExtractionError::DocxError(format!("{BODY_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    body_text(&xml)
}

/// Collect `w:t` runs; `w:p` closes a line, `w:tab` and `w:br` map to tab and newline.
fn body_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_run_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::DocxError(format!("malformed {BODY_PART}: {e}")))?;
        match event {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::DocxError(e.to_string()))?;
                out.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.trim().to_string())
}
