//! Normalized OCR provider model.
//!
//! Every OCR collaborator is adapted into these types: word-level geometry
//! in reading order per page, plus the single concatenated `full_text`
//! string that PHI offsets are defined against.

use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;
use crate::{BlackoutError, Result};

/// A single recognized word. Words are atomic; the core never splits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrWord {
    /// Recognized text, nonempty.
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f64,
    /// Word geometry in page-local coordinates.
    pub bounding_box: BoundingBox,
}

impl OcrWord {
    pub fn new(text: impl Into<String>, confidence: f64, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            bounding_box,
        }
    }
}

/// One page of OCR output. Word order is reading order as supplied by the
/// provider and is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    /// 1-based page number.
    pub page_number: u32,
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
    /// Words in reading order.
    pub words: Vec<OcrWord>,
}

/// Full OCR output for a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Pages in document order.
    pub pages: Vec<OcrPage>,
    /// Concatenated document text over which PHI offsets are defined.
    ///
    /// Contains every word's text as a substring somewhere after the
    /// previous word's occurrence; inter-word whitespace is informational
    /// and provider-dependent (newlines, runs of spaces, punctuation glue).
    pub full_text: String,
}

impl OcrResult {
    /// Total number of words across all pages.
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }

    /// Look up a page by its 1-based number.
    pub fn page(&self, page_number: u32) -> Option<&OcrPage> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Validate the whole result: word geometry, nonempty word texts,
    /// confidence domains, 1-based page numbers.
    ///
    /// # Errors
    ///
    /// [`BlackoutError::InvalidGeometry`] on the first violation; a bad
    /// provider payload is fatal for the request.
    pub fn validate(&self) -> Result<()> {
        for page in &self.pages {
            if page.page_number == 0 {
                return Err(BlackoutError::InvalidGeometry {
                    message: "OCR page numbers are 1-based; got page 0".to_string(),
                });
            }
            for word in &page.words {
                word.bounding_box.validate()?;
                if word.text.is_empty() {
                    return Err(BlackoutError::InvalidGeometry {
                        message: format!("empty word text on page {}", page.page_number),
                    });
                }
                if !(0.0..=1.0).contains(&word.confidence) || !word.confidence.is_finite() {
                    return Err(BlackoutError::InvalidGeometry {
                        message: format!(
                            "word confidence out of [0, 1] on page {}: {}",
                            page.page_number, word.confidence
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x: f64) -> OcrWord {
        OcrWord::new(text, 0.99, BoundingBox::pixel(1, x, 10.0, 40.0, 12.0).unwrap())
    }

    fn single_page(words: Vec<OcrWord>, full_text: &str) -> OcrResult {
        OcrResult {
            pages: vec![OcrPage {
                page_number: 1,
                width: 1000,
                height: 1000,
                words,
            }],
            full_text: full_text.to_string(),
        }
    }

    #[test]
    fn test_word_count_spans_pages() {
        let mut result = single_page(vec![word("a", 0.0), word("b", 50.0)], "a b");
        result.pages.push(OcrPage {
            page_number: 2,
            width: 1000,
            height: 1000,
            words: vec![word("c", 0.0)],
        });
        assert_eq!(result.word_count(), 3);
    }

    #[test]
    fn test_page_lookup_by_number() {
        let result = single_page(vec![], "");
        assert!(result.page(1).is_some());
        assert!(result.page(2).is_none());
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let result = single_page(vec![word("hello", 0.0)], "hello");
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_word() {
        let result = single_page(vec![word("", 0.0)], "");
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_confidence() {
        let mut bad = word("x", 0.0);
        bad.confidence = 1.5;
        let result = single_page(vec![bad], "x");
        assert!(result.validate().is_err());
    }
}
