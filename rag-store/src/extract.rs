//! Text extraction for uploaded sources.
//!
//! PDF pages that cannot be read are skipped; only an empty aggregate is an
//! error. Plain text must be valid UTF-8.

use lopdf::Document;
use tracing::{debug, warn};

use crate::errors::RagError;

/// Kind of an uploaded source, decided from its filename.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Text,
}

impl SourceKind {
    /// Classifies `filename` by extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Succeeds only when `filename` is of the `expected` kind.
    pub fn require(filename: &str, expected: SourceKind) -> Result<(), RagError> {
        if Self::from_filename(filename) == Some(expected) {
            return Ok(());
        }
        Err(RagError::UnsupportedFile {
            filename: filename.to_string(),
            expected: expected.describe(),
        })
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Pdf => "a .pdf file",
            Self::Text => "a .txt file",
        }
    }
}

/// Extracts the text of every readable page, joined with `\n`.
///
/// CPU-bound; call it from `spawn_blocking` in async contexts.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, RagError> {
    let doc = Document::load_mem(bytes).map_err(|e| RagError::Extraction(e.to_string()))?;
    let pages = doc.get_pages();
    debug!(pages = pages.len(), "pdf loaded");

    let texts = pages.keys().map(|&n| match doc.extract_text(&[n]) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(page = n, error = %e, "skipping unreadable pdf page");
            None
        }
    });
    join_page_texts(texts)
}

/// Joins per-page results, dropping unreadable (`None`) pages.
fn join_page_texts<I>(pages: I) -> Result<String, RagError>
where
    I: IntoIterator<Item = Option<String>>,
{
    let joined = pages.into_iter().flatten().collect::<Vec<_>>().join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        return Err(RagError::Extraction("no text found in PDF".into()));
    }
    Ok(trimmed.to_string())
}

/// Decodes an uploaded text file. A leading UTF-8 BOM is dropped.
pub fn decode_text(bytes: Vec<u8>) -> Result<String, RagError> {
    let text = String::from_utf8(bytes).map_err(|e| RagError::Encoding(e.to_string()))?;
    let text = match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    };
    if text.trim().is_empty() {
        return Err(RagError::ContentEmpty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Object, Stream, dictionary};

    fn blank_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn classifies_by_extension() {
        assert_eq!(SourceKind::from_filename("guide.PDF"), Some(SourceKind::Pdf));
        assert_eq!(SourceKind::from_filename("notes.txt"), Some(SourceKind::Text));
        assert_eq!(SourceKind::from_filename("archive.tar.gz"), None);
        assert_eq!(SourceKind::from_filename("README"), None);
    }

    #[test]
    fn require_reports_expected_kind() {
        assert!(SourceKind::require("a.pdf", SourceKind::Pdf).is_ok());
        let err = SourceKind::require("a.docx", SourceKind::Pdf).unwrap_err();
        assert!(matches!(err, RagError::UnsupportedFile { expected: "a .pdf file", .. }));
    }

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, RagError::Extraction(_)));
    }

    #[test]
    fn pdf_without_text_is_an_extraction_error() {
        let err = extract_pdf_text(&blank_pdf()).unwrap_err();
        assert!(matches!(err, RagError::Extraction(_)));
    }

    #[test]
    fn unreadable_pages_are_skipped() {
        let pages = vec![
            Some("page one".to_string()),
            None,
            Some("page three\n".to_string()),
        ];
        assert_eq!(join_page_texts(pages).unwrap(), "page one\npage three");
    }

    #[test]
    fn all_blank_pages_fail() {
        let pages = vec![None, Some("  \n".to_string()), Some(String::new())];
        assert!(matches!(join_page_texts(pages), Err(RagError::Extraction(_))));
    }

    #[test]
    fn decodes_utf8_and_keeps_content() {
        let text = decode_text("ค่าธรรมเนียม 20 บาท\n".as_bytes().to_vec()).unwrap();
        assert_eq!(text, "ค่าธรรมเนียม 20 บาท\n");

        let bom = decode_text(b"\xEF\xBB\xBFhello".to_vec()).unwrap();
        assert_eq!(bom, "hello");
    }

    #[test]
    fn invalid_utf8_and_blank_text_are_rejected() {
        assert!(matches!(decode_text(vec![0xff, 0xfe, 0x00]), Err(RagError::Encoding(_))));
        assert!(matches!(decode_text(b" \n\t".to_vec()), Err(RagError::ContentEmpty)));
    }
}
