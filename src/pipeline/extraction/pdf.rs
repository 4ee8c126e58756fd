//! PDF text extraction via lopdf (pure Rust, no native PDF runtime).

use lopdf::Document;

use super::ExtractionError;

/// Concatenate each page's extracted text in page order.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut document = Document::load_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(format!("failed to load PDF: {e}")))?;

    // Empty password works for unprotected-but-flagged files
    if document.is_encrypted() && document.decrypt("").is_err() {
        return Err(ExtractionError::Pdf(
            "cannot decrypt password-protected PDF".into(),
        ));
    }

    document.decompress();

    let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut text = String::new();
    for page in page_numbers {
        match document.extract_text(&[page]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                // A single unreadable page should not sink the others
                tracing::debug!(page, error = %e, "page text extraction failed");
            }
        }
    }

    Ok(text)
}

/// Build a minimal one-page PDF with the given text, for tests.
#[cfg(test)]
pub(crate) fn make_test_pdf(text: &str) -> Vec<u8> {
    use lopdf::dictionary;
    use lopdf::{Object, Stream};

    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    // Content stream: BT /F1 12 Tf (text) Tj ET
    let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    };

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => resources,
    });

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    });

    if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
        dict.set("Parent", pages_id);
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_digital_pdf() {
        let bytes = make_test_pdf("This agreement binds Landlord and Tenant alike.");
        let text = extract(&bytes).unwrap();
        assert!(
            text.contains("Landlord") && text.contains("Tenant"),
            "unexpected extraction result: {text}"
        );
    }

    #[test]
    fn garbage_bytes_error() {
        assert!(matches!(
            extract(b"not a pdf at all"),
            Err(ExtractionError::Pdf(_))
        ));
    }

    #[test]
    fn empty_input_errors() {
        assert!(extract(b"").is_err());
    }

    #[test]
    fn truncated_header_errors() {
        assert!(extract(b"%PDF-1.7\nthen nothing useful").is_err());
    }
}
