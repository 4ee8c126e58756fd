//! DOCX text extraction: unzip `word/document.xml` and stream-parse it,
//! collecting `w:t` runs and joining paragraphs with newlines.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let cursor = Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| ExtractionError::Docx(format!("not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Docx(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut xml)?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_reader(xml.as_bytes());

    let mut text = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                // Paragraph boundary — mirror how Word separates paragraphs
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Docx(format!(
                    "XML parsing error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn paragraphs_joined_with_newlines() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Section 1. Term of Lease.</w:t></w:r></w:p>
    <w:p><w:r><w:t>Section 2. Rent.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = extract(&build_docx(xml)).unwrap();
        assert_eq!(text, "Section 1. Term of Lease.\nSection 2. Rent.\n");
    }

    #[test]
    fn multiple_runs_in_one_paragraph_concatenate() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
<w:p><w:r><w:t>The Tenant </w:t></w:r><w:r><w:t>shall pay rent.</w:t></w:r></w:p>
</w:body></w:document>"#;
        let text = extract(&build_docx(xml)).unwrap();
        assert_eq!(text, "The Tenant shall pay rent.\n");
    }

    #[test]
    fn text_outside_runs_is_ignored() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
<w:p><w:pPr>ignored style text</w:pPr><w:r><w:t>kept</w:t></w:r></w:p>
</w:body></w:document>"#;
        let text = extract(&build_docx(xml)).unwrap();
        assert_eq!(text, "kept\n");
    }

    #[test]
    fn archive_without_document_xml_errors() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"nope").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(matches!(extract(&bytes), Err(ExtractionError::Docx(_))));
    }

    #[test]
    fn non_zip_bytes_error() {
        assert!(matches!(
            extract(b"plain bytes"),
            Err(ExtractionError::Docx(_))
        ));
    }
}
