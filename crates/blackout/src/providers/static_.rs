//! Canned providers returning preconstructed results.
//!
//! Used by the test suites and by the CLI's replay mode, which drives the
//! full pipeline from recorded provider output instead of live engines.

use async_trait::async_trait;

use crate::document::DocumentFormat;
use crate::types::{MaskingPolicy, OcrResult, PhiEntity};
use crate::Result;

use super::{OcrProvider, PhiProvider};

/// OCR provider that returns a fixed [`OcrResult`] for any input.
#[derive(Debug, Clone)]
pub struct StaticOcrProvider {
    result: OcrResult,
}

impl StaticOcrProvider {
    pub fn new(result: OcrResult) -> Self {
        Self { result }
    }
}

#[async_trait]
impl OcrProvider for StaticOcrProvider {
    async fn analyze(&self, _document: &[u8], _format: DocumentFormat, _language: &str) -> Result<OcrResult> {
        Ok(self.result.clone())
    }
}

/// PHI provider that returns a fixed entity list, filtered by the masking
/// policy the way a live provider would filter.
#[derive(Debug, Clone)]
pub struct StaticPhiProvider {
    entities: Vec<PhiEntity>,
}

impl StaticPhiProvider {
    pub fn new(entities: Vec<PhiEntity>) -> Self {
        Self { entities }
    }
}

#[async_trait]
impl PhiProvider for StaticPhiProvider {
    async fn detect(&self, _full_text: &str, policy: &MaskingPolicy) -> Result<Vec<PhiEntity>> {
        Ok(self
            .entities
            .iter()
            .filter(|e| policy.allows(&e.category))
            .cloned()
            .collect())
    }
}
