//! Paragraph text extraction for Word (`.docx`) documents.
//!
//! A `.docx` file is a ZIP archive whose body lives in `word/document.xml`.
//! Only the plain text of each body paragraph (`w:p`) is kept: runs (`w:t`)
//! are concatenated, `w:tab` becomes a tab and `w:br`/`w:cr` a newline.
//! Formatting, tables, content controls, headers and footers are ignored.
//! Each paragraph is trimmed and empty paragraphs are dropped, so the result
//! is the ordered list of non-empty lines the pair parser consumes.

use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use thiserror::Error;

/// Name of the main document part inside the archive.
const DOCUMENT_PART: &str = "word/document.xml";
/// Maximum decompressed bytes to read from the document part (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// A source file could not be opened or parsed as a `.docx` document.
///
/// The corpus loader logs it and skips the file; it never aborts startup.
#[derive(Debug, Error)]
#[error("cannot read document {}: {kind}", .path.display())]
pub struct DocumentReadError {
    pub path: PathBuf,
    pub kind: ReadErrorKind,
}

#[derive(Debug, Error)]
pub enum ReadErrorKind {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid docx archive: {0}")]
    Archive(String),
    #[error("malformed document xml: {0}")]
    Xml(String),
}

/// Reads a `.docx` file and returns its non-empty, trimmed paragraph lines.
pub fn read_paragraph_lines(path: &Path) -> Result<Vec<String>, DocumentReadError> {
    let wrap = |kind| DocumentReadError {
        path: path.to_path_buf(),
        kind,
    };
    let bytes = std::fs::read(path).map_err(|e| wrap(ReadErrorKind::Io(e)))?;
    paragraph_lines_from_bytes(&bytes).map_err(wrap)
}

/// Same as [`read_paragraph_lines`] for a document already held in memory.
pub fn paragraph_lines_from_bytes(bytes: &[u8]) -> Result<Vec<String>, ReadErrorKind> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ReadErrorKind::Archive(e.to_string()))?;
    let xml = read_zip_entry_bounded(&mut archive, DOCUMENT_PART, MAX_XML_ENTRY_BYTES)?;
    paragraphs_from_xml(&xml)
}

fn read_zip_entry_bounded(
    archive: &mut zip::ZipArchive<std::io::Cursor<&[u8]>>,
    name: &str,
    max_bytes: u64,
) -> Result<Vec<u8>, ReadErrorKind> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ReadErrorKind::Archive(format!("{}: {}", name, e)))?;
    let mut out = Vec::new();
    entry.take(max_bytes).read_to_end(&mut out)?;
    if out.len() as u64 >= max_bytes {
        return Err(ReadErrorKind::Archive(format!(
            "ZIP entry {} exceeds size limit ({} bytes)",
            name, max_bytes
        )));
    }
    Ok(out)
}

/// Walks `word/document.xml` and collects the text of every body paragraph.
///
/// Only paragraphs that are direct children of `w:body` become lines.
/// Paragraphs in tables, content controls (`w:sdt`) or custom XML are
/// skipped, and so is the text of paragraphs nested in another paragraph
/// (text boxes).
fn paragraphs_from_xml(xml: &[u8]) -> Result<Vec<String>, ReadErrorKind> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    // Runs may begin or end with significant spaces.
    reader.config_mut().trim_text(false);

    let mut lines = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    // Local names of the currently open elements.
    let mut open: Vec<Vec<u8>> = Vec::new();
    // Depth of the open body-level paragraph, if any.
    let mut body_paragraph: Option<usize> = None;
    let mut nested_paragraphs = 0usize;
    let mut in_text = false;

    loop {
        let collecting = body_paragraph.is_some() && nested_paragraphs == 0;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"p" if body_paragraph.is_none() => {
                        if open.last().is_some_and(|parent| parent == b"body") {
                            body_paragraph = Some(open.len() + 1);
                        }
                    }
                    b"p" => nested_paragraphs += 1,
                    b"t" => in_text = collecting,
                    _ => {}
                }
                open.push(name);
            }
            Ok(Event::Empty(e)) if collecting => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(te)) if in_text => {
                let chunk = te
                    .unescape()
                    .map_err(|e| ReadErrorKind::Xml(e.to_string()))?;
                current.push_str(&chunk);
            }
            Ok(Event::End(e)) => {
                let depth = open.len();
                open.pop();
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if body_paragraph == Some(depth) => {
                        body_paragraph = None;
                        let trimmed = current.trim();
                        if !trimmed.is_empty() {
                            lines.push(trimmed.to_string());
                        }
                        current.clear();
                    }
                    b"p" if body_paragraph.is_some() => {
                        nested_paragraphs = nested_paragraphs.saturating_sub(1)
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ReadErrorKind::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(lines)
}
