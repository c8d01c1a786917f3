//! Collaborator interfaces for OCR and PHI detection.
//!
//! The core is provider-agnostic: any engine that can emit the normalized
//! model in [`crate::types`] plugs in behind these traits. Providers are
//! swapped at construction and composed, never inherited; each
//! implementation owns its client lifetimes and surfaces failures through
//! [`BlackoutError`](crate::BlackoutError) at the boundary.

mod chunk;
mod static_;

pub use chunk::ChunkedPhiProvider;
pub use static_::{StaticOcrProvider, StaticPhiProvider};

use async_trait::async_trait;

use crate::document::DocumentFormat;
use crate::types::{MaskingPolicy, OcrResult, PhiEntity};
use crate::Result;

/// OCR collaborator: raster document in, word-level geometry out.
///
/// Implementations must emit reading-order words per page and a
/// `full_text` whose substring occurrences of each word align with that
/// order. Engines that return polygons convert them to the enclosing
/// axis-aligned box before handing the result over.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn analyze(&self, document: &[u8], format: DocumentFormat, language: &str) -> Result<OcrResult>;
}

/// PHI-detection collaborator: document text in, annotated spans out.
///
/// Filtering by masking level is the provider's responsibility; the core
/// masks whatever entities come back. Returned offsets are character
/// positions into the exact `full_text` string passed in.
#[async_trait]
pub trait PhiProvider: Send + Sync {
    async fn detect(&self, full_text: &str, policy: &MaskingPolicy) -> Result<Vec<PhiEntity>>;
}
