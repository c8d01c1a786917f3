//! PHI entity model and masking policy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// De-identification standard driving category filtering.
///
/// Filtering by level is the PHI provider's responsibility; the core masks
/// whatever entities it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaskingLevel {
    /// Remove all identifier categories.
    #[default]
    SafeHarbor,
    /// Preserve provider/organization identifiers, remove the rest.
    LimitedDataset,
    /// Remove only the categories named in the policy's custom set.
    Custom,
}

/// Masking level plus the caller-supplied category set for [`MaskingLevel::Custom`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskingPolicy {
    pub level: MaskingLevel,
    /// Categories to mask under `Custom`; ignored for the other levels.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub custom_categories: BTreeSet<String>,
}

/// Category substrings treated as provider/organization identifiers under
/// `LimitedDataset`. Category tags themselves stay opaque; this list only
/// exists so the bundled providers can implement the level's suppression rule.
const PROVIDER_CATEGORY_MARKERS: [&str; 4] = ["doctor", "provider", "organization", "facility"];

impl MaskingPolicy {
    pub fn new(level: MaskingLevel, custom_categories: BTreeSet<String>) -> Self {
        Self {
            level,
            custom_categories,
        }
    }

    /// Whether an entity of the given category should be reported for masking.
    pub fn allows(&self, category: &str) -> bool {
        match self.level {
            MaskingLevel::SafeHarbor => true,
            MaskingLevel::LimitedDataset => {
                let lowered = category.to_ascii_lowercase();
                !PROVIDER_CATEGORY_MARKERS.iter().any(|m| lowered.contains(m))
            }
            MaskingLevel::Custom => self.custom_categories.contains(category),
        }
    }
}

/// A PHI span reported by the detection collaborator.
///
/// `offset`/`length` are character positions into
/// [`OcrResult::full_text`](crate::types::OcrResult). When the substring at
/// that range disagrees with `text` (provider drift), `text` is
/// authoritative for validation and `offset`/`length` for position; the
/// matcher reconciles the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhiEntity {
    pub text: String,
    /// Opaque category tag, e.g. `Person`, `Date`, `SSN`. Never normalized.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Character offset into the document `full_text`.
    pub offset: usize,
    /// Character length of the span, `> 0`.
    pub length: usize,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f64,
}

impl PhiEntity {
    pub fn new(
        text: impl Into<String>,
        category: impl Into<String>,
        offset: usize,
        length: usize,
        confidence: f64,
    ) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            subcategory: None,
            offset,
            length,
            confidence,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}
