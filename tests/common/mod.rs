//! Helpers shared by the integration tests: building real `.docx` files.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

/// Minimal docx (ZIP) whose `word/document.xml` holds one `w:p` per line.
pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            format!(
                "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                escape_xml(p)
            )
        })
        .collect();
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
            body
        );
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf
}

pub fn write_docx(dir: &Path, name: &str, paragraphs: &[&str]) {
    std::fs::write(dir.join(name), docx_with_paragraphs(paragraphs)).unwrap();
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Writes the standard fixture set into `dir`:
/// two eligible documents, one corrupt eligible file, and files the
/// name pattern must ignore.
pub fn write_fixture_docs(dir: &Path) {
    write_docx(
        dir,
        "OSP1.docx",
        &[
            "Раздел 1. Основы",
            "1. S: Что такое ось: Прямая, вокруг которой происходит вращение",
            "I: дополнительная информация",
            "S: Что такое плоскость",
            "= Поверхность, содержащая любую прямую, соединяющую её точки",
            "S: Вопрос без ответа",
            "I: нет ответа",
        ],
    );
    write_docx(
        dir,
        "OSP2.docx",
        &[
            "S: What is the boiling point of water =",
            "100 degrees Celsius at sea level",
            "S: Don't panic: Carry a towel",
        ],
    );
    std::fs::write(dir.join("OSP3.docx"), b"this is not a zip archive").unwrap();
    write_docx(dir, "OSP13.docx", &["S: Out of range: ignored"]);
    write_docx(dir, "notes.docx", &["S: Wrong prefix: ignored"]);
    std::fs::write(dir.join("OSP4.txt"), "S: Wrong extension: ignored").unwrap();
}
