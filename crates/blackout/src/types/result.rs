//! Output model: mask regions, counts, and the result envelope.

use bytes::Bytes;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;

/// One rectangle to paint, with its originating category and confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskRegion {
    /// 1-based page number.
    pub page: u32,
    pub bounding_box: BoundingBox,
    /// Category of the entity that produced this region.
    pub category: String,
    /// Confidence of the entity that produced this region.
    pub confidence: f64,
}

/// Terminal status of a de-identification run.
///
/// Partial success (some entities unmatched, document still produced) is
/// still [`RunStatus::Success`]; the counts carry the anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failure,
}

/// Per-run tallies reported alongside the masked document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeidentifyCounts {
    pub pages_processed: usize,
    pub entities_detected: usize,
    /// Entities dropped by the confidence threshold. Not a failure.
    pub entities_filtered: usize,
    /// Entities that could not be located in OCR output. Not fatal.
    pub entities_unmatched: usize,
    pub regions_produced: usize,
    /// OCR words the offset index could not place in `full_text`.
    pub words_unresolved: usize,
}

/// Serializable run report: status, counts, regions, timing, error list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeidentifyReport {
    pub status: RunStatus,
    pub counts: DeidentifyCounts,
    /// Produced regions ordered by `(page, y, x)`.
    pub regions: Vec<MaskRegion>,
    pub elapsed_ms: u64,
    /// Ordered list of recoverable anomalies and, on failure, the fatal error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl DeidentifyReport {
    /// A failure report carrying a single fatal error message.
    pub fn failure(message: String, elapsed_ms: u64) -> Self {
        Self {
            status: RunStatus::Failure,
            counts: DeidentifyCounts::default(),
            regions: Vec::new(),
            elapsed_ms,
            errors: vec![message],
        }
    }
}

/// Full result of a de-identification run.
///
/// Request-scoped; holds the masked page buffers, so it is deliberately not
/// serializable. Persist [`DeidentifyReport`] and `masked_document` instead.
#[derive(Debug, Clone)]
pub struct DeidentificationResult {
    pub report: DeidentifyReport,
    /// Masked document re-encoded in the input format. Empty on failure.
    pub masked_document: Bytes,
    /// Masked page images, in page order. Empty on failure.
    pub pages: Vec<RgbaImage>,
}
