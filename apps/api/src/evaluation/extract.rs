//! Text extraction for uploaded resumes.
//!
//! PDFs are read page by page with `lopdf`; a page that fails to decode yields
//! nothing instead of failing the whole document. Anything else is treated as
//! UTF-8 text with undecodable bytes dropped.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Declared content types the upload endpoint accepts.
pub const ALLOWED_CONTENT_TYPES: [&str; 2] = [PDF_CONTENT_TYPE, TEXT_CONTENT_TYPE];

const PAGE_SEPARATOR: &str = "\n";

pub fn is_allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type)
}

/// Produces best-effort plain text from raw upload bytes.
///
/// Only a structurally invalid PDF container is an error; the text path never fails.
pub fn extract_text(bytes: &[u8], content_type: &str) -> Result<String, AppError> {
    if content_type == PDF_CONTENT_TYPE {
        extract_pdf_text(bytes)
    } else {
        Ok(decode_utf8_dropping_invalid(bytes))
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let doc = Document::load_mem(bytes).map_err(|e| AppError::MalformedDocument(e.to_string()))?;

    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .map(|page_num| match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                debug!("No extractable text on page {page_num}: {e}");
                String::new()
            }
        })
        .collect();

    if pages.iter().any(|p| !p.trim().is_empty()) {
        return Ok(pages.join(PAGE_SEPARATOR));
    }

    debug!(
        "Per-page extraction found no text in {} page(s), trying pdf-extract",
        pages.len()
    );
    Ok(fallback_extract(bytes).unwrap_or_default())
}

/// Whole-document pass with `pdf-extract`, which copes with some font encodings
/// `lopdf` cannot decode. It is known to panic on unusual inputs, so panics are
/// contained here and treated like any other failure.
fn fallback_extract(bytes: &[u8]) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    })) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            debug!("pdf-extract fallback failed: {e}");
            None
        }
        Err(_) => {
            warn!("pdf-extract fallback panicked; treating document as empty");
            None
        }
    }
}

/// UTF-8 decode that silently skips invalid byte sequences.
fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Builds a minimal PDF with one page per entry. `None` yields a page without
/// a content stream.
#[cfg(test)]
pub(crate) fn build_test_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
        };
        if let Some(text) = text {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page.set("Contents", content_id);
        }
        kids.push(doc.add_object(page).into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
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
    fn test_empty_text_upload_yields_empty_string() {
        assert_eq!(extract_text(b"", TEXT_CONTENT_TYPE).unwrap(), "");
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = extract_text("Senior Python developer".as_bytes(), TEXT_CONTENT_TYPE).unwrap();
        assert_eq!(text, "Senior Python developer");
    }

    #[test]
    fn test_invalid_utf8_bytes_are_dropped() {
        let text = extract_text(b"Py\xfft\xc3hon", TEXT_CONTENT_TYPE).unwrap();
        assert_eq!(text, "Python");
    }

    #[test]
    fn test_unknown_type_is_decoded_as_text() {
        // Mislabelled PDF bytes are not parsed as PDF.
        let pdf = build_test_pdf(&[Some("Python developer")]);
        assert!(extract_text(&pdf, "application/octet-stream").is_ok());
    }

    #[test]
    fn test_single_page_pdf_contains_text() {
        let pdf = build_test_pdf(&[Some("Python developer")]);
        let text = extract_text(&pdf, PDF_CONTENT_TYPE).unwrap();
        assert!(text.contains("Python"), "got {text:?}");
    }

    #[test]
    fn test_pages_are_kept_in_order() {
        let pdf = build_test_pdf(&[Some("Experience"), Some("Education")]);
        let text = extract_text(&pdf, PDF_CONTENT_TYPE).unwrap();
        let first = text.find("Experience").expect("page 1 text");
        let second = text.find("Education").expect("page 2 text");
        assert!(first < second);
        assert!(!text.contains("ExperienceEducation"));
    }

    #[test]
    fn test_page_without_content_contributes_nothing() {
        let pdf = build_test_pdf(&[None, Some("Machine learning")]);
        let text = extract_text(&pdf, PDF_CONTENT_TYPE).unwrap();
        assert!(text.contains("Machine learning"));
    }

    #[test]
    fn test_pdf_without_any_text_is_empty_not_an_error() {
        // Every page blank: the whole-document fallback runs and finds nothing.
        let pdf = build_test_pdf(&[None, None]);
        let text = extract_text(&pdf, PDF_CONTENT_TYPE).unwrap();
        assert!(text.trim().is_empty(), "got {text:?}");
    }

    #[test]
    fn test_malformed_pdf_is_an_error() {
        let err = extract_text(b"definitely not a pdf", PDF_CONTENT_TYPE).unwrap_err();
        assert!(matches!(err, AppError::MalformedDocument(_)));
    }

    #[test]
    fn test_allow_list_is_exact() {
        assert!(is_allowed_content_type("application/pdf"));
        assert!(is_allowed_content_type("text/plain"));
        assert!(!is_allowed_content_type("image/png"));
        assert!(!is_allowed_content_type("application/octet-stream"));
        assert!(!is_allowed_content_type(""));
    }
}
