//! PDF text extraction behind a swappable trait.

use std::path::Path;

use thiserror::Error;

/// Errors produced while pulling text out of a downloaded document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document could not be parsed as a PDF.
    #[error("Failed to extract text from PDF: {message}")]
    Parse {
        /// Underlying extraction failure, rendered as text.
        message: String,
    },
}

/// Interface implemented by document text extractors.
///
/// Extraction is synchronous and CPU-bound; callers are expected to run it on
/// a blocking thread. `Ok(None)` means the document parsed but exposed no
/// text at all, for example a scanned PDF without an OCR layer.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of the document at `path`.
    fn extract(&self, path: &Path) -> Result<Option<String>, ExtractError>;
}

/// Extractor backed by the `pdf-extract` crate.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<Option<String>, ExtractError> {
        let text = pdf_extract::extract_text(path).map_err(|error| ExtractError::Parse {
            message: error.to_string(),
        })?;

        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_non_pdf_bytes() {
        // pdf-extract needs actual PDF bytes, so only the error path is
        // exercised here.
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file.pdf");
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"This is not a PDF").expect("write");

        let result = PdfExtractor.extract(&path);

        assert!(matches!(result, Err(ExtractError::Parse { .. })));
    }
}
