//! Core types for document de-identification.

pub mod geometry;
pub mod ocr;
pub mod phi;
pub mod result;

pub use geometry::{union, BoundingBox, CoordinateSpace};
pub use ocr::{OcrPage, OcrResult, OcrWord};
pub use phi::{MaskingLevel, MaskingPolicy, PhiEntity};
pub use result::{DeidentificationResult, DeidentifyCounts, DeidentifyReport, MaskRegion, RunStatus};
