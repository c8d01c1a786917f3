//! Run configuration.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mask::PainterConfig;
use crate::matcher::MatcherConfig;
use crate::types::{MaskingLevel, MaskingPolicy};
use crate::{BlackoutError, Result};

/// Full configuration surface for one de-identification run.
///
/// Everything is optional in serialized form (TOML or JSON); absent keys
/// take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeidentifyConfig {
    /// De-identification standard handed to the PHI provider.
    pub masking_level: MaskingLevel,
    /// Categories to mask under `MaskingLevel::Custom`.
    pub custom_categories: BTreeSet<String>,
    /// Entities below this confidence are dropped.
    pub confidence_threshold: f64,
    /// Pixels added around each produced mask box.
    pub padding_px: u32,
    /// Edit-distance bound for the offset index's fuzzy stage.
    pub fuzzy_word_threshold: usize,
    /// Edit-distance bound for the matcher's fallbacks.
    pub fuzzy_entity_threshold: usize,
    /// Similarity floor for the matcher's fuzzy window.
    pub min_similarity_ratio: f64,
    /// Upper bound on the payload submitted to OCR.
    pub max_ocr_size_mb: f64,
    /// Fill color for production masks.
    pub mask_color: [u8; 3],
    /// Render translucent annotated masks instead of opaque ones.
    pub debug_mode: bool,
    /// Language hint forwarded to the OCR provider.
    pub language: String,
}

impl Default for DeidentifyConfig {
    fn default() -> Self {
        Self {
            masking_level: MaskingLevel::SafeHarbor,
            custom_categories: BTreeSet::new(),
            confidence_threshold: 0.80,
            padding_px: 5,
            fuzzy_word_threshold: 2,
            fuzzy_entity_threshold: 2,
            min_similarity_ratio: 0.6,
            max_ocr_size_mb: 10.0,
            mask_color: [0, 0, 0],
            debug_mode: false,
            language: "en".to_string(),
        }
    }
}

impl DeidentifyConfig {
    /// Parse from a TOML document.
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(|e| BlackoutError::Configuration {
            message: format!("unparseable config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| BlackoutError::Configuration {
            message: format!("cannot read config {}: {e}", path.as_ref().display()),
        })?;
        Self::from_toml(&raw)
    }

    /// Check value domains.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(BlackoutError::Configuration {
                message: format!("confidence_threshold out of [0, 1]: {}", self.confidence_threshold),
            });
        }
        if !(0.0..=1.0).contains(&self.min_similarity_ratio) {
            return Err(BlackoutError::Configuration {
                message: format!("min_similarity_ratio out of [0, 1]: {}", self.min_similarity_ratio),
            });
        }
        if self.max_ocr_size_mb <= 0.0 {
            return Err(BlackoutError::Configuration {
                message: format!("max_ocr_size_mb must be positive: {}", self.max_ocr_size_mb),
            });
        }
        Ok(())
    }

    /// Matcher view of this configuration.
    pub fn matcher(&self) -> MatcherConfig {
        MatcherConfig {
            confidence_threshold: self.confidence_threshold,
            padding_px: self.padding_px,
            fuzzy_entity_threshold: self.fuzzy_entity_threshold,
            min_similarity_ratio: self.min_similarity_ratio,
            merge_adjacent: true,
        }
    }

    /// Painter view of this configuration.
    pub fn painter(&self) -> PainterConfig {
        PainterConfig {
            mask_color: self.mask_color,
            debug_mode: self.debug_mode,
        }
    }

    /// Policy handed to the PHI provider.
    pub fn policy(&self) -> MaskingPolicy {
        MaskingPolicy::new(self.masking_level, self.custom_categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_surface() {
        let config = DeidentifyConfig::default();
        assert_eq!(config.masking_level, MaskingLevel::SafeHarbor);
        assert!(config.custom_categories.is_empty());
        assert_eq!(config.confidence_threshold, 0.80);
        assert_eq!(config.padding_px, 5);
        assert_eq!(config.fuzzy_word_threshold, 2);
        assert_eq!(config.fuzzy_entity_threshold, 2);
        assert_eq!(config.min_similarity_ratio, 0.6);
        assert_eq!(config.max_ocr_size_mb, 10.0);
        assert_eq!(config.mask_color, [0, 0, 0]);
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DeidentifyConfig::from_toml(
            r#"
            confidence_threshold = 0.5
            mask_color = [255, 255, 255]
            "#,
        )
        .unwrap();
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.mask_color, [255, 255, 255]);
        assert_eq!(config.padding_px, 5);
    }

    #[test]
    fn test_masking_level_from_toml() {
        let config = DeidentifyConfig::from_toml(
            r#"
            masking_level = "custom"
            custom_categories = ["SSN", "Person"]
            "#,
        )
        .unwrap();
        assert_eq!(config.masking_level, MaskingLevel::Custom);
        assert!(config.policy().allows("SSN"));
        assert!(!config.policy().allows("Date"));
    }

    #[test]
    fn test_out_of_domain_values_rejected() {
        assert!(DeidentifyConfig::from_toml("confidence_threshold = 1.5").is_err());
        assert!(DeidentifyConfig::from_toml("min_similarity_ratio = -0.1").is_err());
        assert!(DeidentifyConfig::from_toml("max_ocr_size_mb = 0.0").is_err());
    }

    #[test]
    fn test_unparseable_toml_rejected() {
        assert!(DeidentifyConfig::from_toml("not valid [[ toml").is_err());
    }
}
