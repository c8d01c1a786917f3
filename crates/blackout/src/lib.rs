//! Blackout: de-identification engine for scanned medical documents.
//!
//! Given a scanned document, Blackout produces a visually masked copy in
//! which every region of text carrying Protected Health Information has
//! been painted over. The engine does not perform OCR or PHI detection
//! itself; those are collaborators behind the [`providers`] traits. What
//! it owns is the hard middle: reconciling the OCR provider's word-level
//! geometry with the PHI detector's character-offset annotations into
//! pixel rectangles, and painting them.
//!
//! # Pipeline
//!
//! 1. [`document`]: multi-page raster load/save (TIFF, PNG).
//! 2. [`providers`]: OCR and PHI collaborator interfaces.
//! 3. [`index`]: aligns every OCR word to its character span in the
//!    concatenated document text.
//! 4. [`matcher`]: resolves each PHI span to word geometry and emits one
//!    mask rectangle per page touched.
//! 5. [`mask`]: paints opaque rectangles into copies of the page images.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use blackout::{
//!     deidentify, DeidentifyConfig, DocumentFormat,
//!     providers::{StaticOcrProvider, StaticPhiProvider},
//! };
//!
//! # async fn run(document: bytes::Bytes, ocr: blackout::types::OcrResult) -> blackout::Result<()> {
//! let result = deidentify(
//!     Arc::new(StaticOcrProvider::new(ocr)),
//!     Arc::new(StaticPhiProvider::new(vec![])),
//!     document,
//!     DocumentFormat::Tiff,
//!     &DeidentifyConfig::default(),
//! )
//! .await?;
//! println!("{} regions painted", result.report.counts.regions_produced);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod mask;
pub mod matcher;
pub mod pipeline;
pub mod providers;
pub mod types;

pub use config::DeidentifyConfig;
pub use document::{DocumentFormat, DocumentIo, DocumentMetadata, RasterIo};
pub use error::{BlackoutError, Result};
pub use pipeline::{deidentify, Deidentifier};
pub use types::{
    BoundingBox, CoordinateSpace, DeidentificationResult, DeidentifyCounts, DeidentifyReport,
    MaskRegion, MaskingLevel, MaskingPolicy, OcrPage, OcrResult, OcrWord, PhiEntity, RunStatus,
};
