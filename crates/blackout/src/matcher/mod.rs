//! Entity-to-geometry resolution.
//!
//! For each detected PHI span the matcher locates the OCR words it covers
//! and emits one mask rectangle per page touched. The PHI provider's
//! offsets are the source of truth for *where*, the entity's text for
//! *what*; when the two disagree the matcher walks a three-stage fallback:
//! exact offset overlap, a fuzzy window slide around the reported offset,
//! and finally a literal search over the whole text.

pub mod distance;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::index::{OffsetIndex, WordOffset};
use crate::types::geometry::{union, CoordinateSpace};
use crate::types::{MaskRegion, OcrResult, PhiEntity};
use crate::Result;

use distance::{bounded_levenshtein, similarity};

/// Matcher tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Entities below this confidence are dropped before matching.
    pub confidence_threshold: f64,
    /// Pixels added on all four sides of each produced box, clamped to the page.
    pub padding_px: u32,
    /// Maximum edit distance accepted by the offset fallbacks.
    pub fuzzy_entity_threshold: usize,
    /// Similarity floor guarding the fuzzy window against coincidental alignment.
    pub min_similarity_ratio: f64,
    /// Union same-page words produced by one entity into a single box.
    pub merge_adjacent: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.0,
            padding_px: 5,
            fuzzy_entity_threshold: 2,
            min_similarity_ratio: 0.6,
            merge_adjacent: true,
        }
    }
}

/// Terminal state of one entity's walk through the matcher.
///
/// `Filtered` is terminal and not reported as failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityOutcome {
    Filtered,
    Matched,
    Unmatched,
}

/// Matcher output: the regions plus one outcome per input entity, in input
/// order.
#[derive(Debug, Clone)]
pub struct MatchOutput {
    /// Produced regions ordered by `(page, y, x)`, deduplicated.
    pub regions: Vec<MaskRegion>,
    pub outcomes: Vec<EntityOutcome>,
    /// One message per unmatched entity, in input order.
    pub errors: Vec<String>,
}

impl MatchOutput {
    pub fn matched(&self) -> usize {
        self.outcomes.iter().filter(|o| **o == EntityOutcome::Matched).count()
    }

    pub fn filtered(&self) -> usize {
        self.outcomes.iter().filter(|o| **o == EntityOutcome::Filtered).count()
    }

    pub fn unmatched(&self) -> usize {
        self.outcomes.iter().filter(|o| **o == EntityOutcome::Unmatched).count()
    }
}

/// Match all entities against the offset index and produce mask regions.
///
/// Entities are processed in input order; an entity spanning N pages yields
/// N regions. Regions from distinct entities are never merged, but
/// byte-identical duplicates (same page, corners within one pixel) are
/// dropped.
///
/// # Errors
///
/// [`BlackoutError::InvalidGeometry`](crate::BlackoutError) when a single
/// entity's words mix coordinate spaces on one page; geometry that bad is
/// fatal for the request.
pub fn match_entities(
    ocr: &OcrResult,
    index: &OffsetIndex,
    entities: &[PhiEntity],
    config: &MatcherConfig,
) -> Result<MatchOutput> {
    let mut regions: Vec<MaskRegion> = Vec::new();
    let mut outcomes = Vec::with_capacity(entities.len());
    let mut errors = Vec::new();

    for entity in entities {
        if entity.confidence < config.confidence_threshold {
            debug!(
                category = %entity.category,
                confidence = entity.confidence,
                threshold = config.confidence_threshold,
                "entity filtered below confidence threshold"
            );
            outcomes.push(EntityOutcome::Filtered);
            continue;
        }

        match resolve_entity(ocr, index, entity, config) {
            Some(words) => {
                let produced = build_regions(ocr, entity, &words, config)?;
                debug!(
                    category = %entity.category,
                    words = words.len(),
                    regions = produced.len(),
                    "entity matched"
                );
                regions.extend(produced);
                outcomes.push(EntityOutcome::Matched);
            }
            None => {
                warn!(
                    category = %entity.category,
                    offset = entity.offset,
                    length = entity.length,
                    "entity could not be located in OCR output"
                );
                errors.push(format!(
                    "unmatched entity: category={} offset={} length={}",
                    entity.category, entity.offset, entity.length
                ));
                outcomes.push(EntityOutcome::Unmatched);
            }
        }
    }

    let regions = dedupe_regions(ocr, regions);
    Ok(MatchOutput {
        regions: sort_regions(regions),
        outcomes,
        errors,
    })
}

/// Locate the OCR words covered by one entity.
///
/// State machine per entity:
/// `ExactTried -> FuzzyTried -> AggressiveTried -> Matched | Unmatched`.
fn resolve_entity<'a>(
    ocr: &OcrResult,
    index: &'a OffsetIndex,
    entity: &PhiEntity,
    config: &MatcherConfig,
) -> Option<Vec<&'a WordOffset>> {
    let entity_chars: Vec<char> = entity.text.chars().collect();
    if entity_chars.is_empty() || entity.length == 0 {
        return None;
    }
    let chars = index.chars();

    // Exact offset overlap, validated against the entity text.
    let span_end = entity.offset.saturating_add(entity.length);
    let words = index.overlapping(entity.offset, span_end);
    if !words.is_empty() && words_match_text(ocr, &words, &entity_chars, config.fuzzy_entity_threshold) {
        return Some(words);
    }

    // Fuzzy window slide around the reported offset.
    if let Some(words) = fuzzy_offset_match(index, entity, &entity_chars, config) {
        return Some(words);
    }

    // Aggressive: nearest literal occurrence anywhere in the text.
    let occurrence = nearest_literal_occurrence(chars, &entity_chars, entity.offset)?;
    let words = index.overlapping(occurrence, occurrence + entity_chars.len());
    (!words.is_empty()).then_some(words)
}

/// Whether the space-joined texts of `words` are within edit distance
/// `threshold` of the entity text.
fn words_match_text(
    ocr: &OcrResult,
    words: &[&WordOffset],
    entity_chars: &[char],
    threshold: usize,
) -> bool {
    let joined: String = words
        .iter()
        .map(|w| ocr.pages[w.page_index].words[w.word_index].text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let joined_chars: Vec<char> = joined.chars().collect();
    bounded_levenshtein(&joined_chars, entity_chars, threshold).is_some()
}

/// Slide a window of the entity's length over `full_text` within
/// `±entity.length` of the reported offset; take the position minimizing
/// edit distance (ties: smaller offset delta). Accept only above the
/// similarity floor, then recompute the overlapping words for the new span.
fn fuzzy_offset_match<'a>(
    index: &'a OffsetIndex,
    entity: &PhiEntity,
    entity_chars: &[char],
    config: &MatcherConfig,
) -> Option<Vec<&'a WordOffset>> {
    let chars = index.chars();
    let elen = entity_chars.len();
    let first = entity.offset.saturating_sub(entity.length);
    let last = entity.offset.saturating_add(entity.length).min(chars.len());
    if first > last {
        return None;
    }

    let mut best: Option<(usize, usize, usize)> = None; // (distance, delta, position)
    for pos in first..=last {
        let slice = &chars[pos.min(chars.len())..(pos + elen).min(chars.len())];
        let Some(dist) = bounded_levenshtein(slice, entity_chars, config.fuzzy_entity_threshold) else {
            continue;
        };
        let delta = pos.abs_diff(entity.offset);
        let better = match best {
            Some((bd, bdelta, _)) => dist < bd || (dist == bd && delta < bdelta),
            None => true,
        };
        if better {
            best = Some((dist, delta, pos));
        }
    }

    // The similarity floor gates the winning position, not the search.
    let (dist, _, pos) = best?;
    let slice_len = (pos + elen).min(chars.len()) - pos.min(chars.len());
    if similarity(dist, slice_len, elen) < config.min_similarity_ratio {
        return None;
    }
    let words = index.overlapping(pos, pos + elen);
    (!words.is_empty()).then_some(words)
}

/// Position of the literal occurrence of `needle` nearest to `origin`.
fn nearest_literal_occurrence(chars: &[char], needle: &[char], origin: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > chars.len() {
        return None;
    }
    let mut nearest: Option<(usize, usize)> = None; // (delta, position)
    for pos in 0..=(chars.len() - needle.len()) {
        if &chars[pos..pos + needle.len()] == needle {
            let delta = pos.abs_diff(origin);
            match nearest {
                Some((best_delta, _)) if best_delta <= delta => {}
                _ => nearest = Some((delta, pos)),
            }
        }
    }
    nearest.map(|(_, pos)| pos)
}

/// Partition the chosen words by page and emit one padded region per page
/// (or per word when `merge_adjacent` is off).
fn build_regions(
    ocr: &OcrResult,
    entity: &PhiEntity,
    words: &[&WordOffset],
    config: &MatcherConfig,
) -> Result<Vec<MaskRegion>> {
    let mut by_page: BTreeMap<u32, Vec<&WordOffset>> = BTreeMap::new();
    for &word in words {
        by_page.entry(word.page_number).or_default().push(word);
    }

    let pad = f64::from(config.padding_px);
    let mut regions = Vec::new();
    for (page_number, group) in by_page {
        let page = &ocr.pages[group[0].page_index];
        let page_w = f64::from(page.width).max(1.0);
        let page_h = f64::from(page.height).max(1.0);

        let boxes: Vec<_> = group
            .iter()
            .map(|w| ocr.pages[w.page_index].words[w.word_index].bounding_box)
            .collect();
        let merged = if config.merge_adjacent {
            vec![union(&boxes)?]
        } else {
            boxes
        };

        for bbox in merged {
            let (pad_x, pad_y, clamp) = match bbox.space {
                CoordinateSpace::Pixel => (pad, pad, (page_w, page_h)),
                CoordinateSpace::Normalized => (pad / page_w, pad / page_h, (1.0, 1.0)),
            };
            regions.push(MaskRegion {
                page: page_number,
                bounding_box: bbox.inflate(pad_x, pad_y, Some(clamp)),
                category: entity.category.clone(),
                confidence: entity.confidence,
            });
        }
    }
    Ok(regions)
}

/// Drop regions identical to an earlier one: same page, corners within one
/// pixel. Overlapping paint from distinct rectangles is left alone.
fn dedupe_regions(ocr: &OcrResult, regions: Vec<MaskRegion>) -> Vec<MaskRegion> {
    let mut kept: Vec<MaskRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        let (eps_x, eps_y) = match region.bounding_box.space {
            CoordinateSpace::Pixel => (1.0, 1.0),
            CoordinateSpace::Normalized => {
                let (w, h) = ocr
                    .page(region.page)
                    .map(|p| (f64::from(p.width).max(1.0), f64::from(p.height).max(1.0)))
                    .unwrap_or((1.0, 1.0));
                (1.0 / w, 1.0 / h)
            }
        };
        let duplicate = kept.iter().any(|k| {
            k.page == region.page
                && k.bounding_box.space == region.bounding_box.space
                && (k.bounding_box.x - region.bounding_box.x).abs() <= eps_x
                && (k.bounding_box.y - region.bounding_box.y).abs() <= eps_y
                && (k.bounding_box.right() - region.bounding_box.right()).abs() <= eps_x
                && (k.bounding_box.bottom() - region.bounding_box.bottom()).abs() <= eps_y
        });
        if !duplicate {
            kept.push(region);
        }
    }
    kept
}

fn sort_regions(mut regions: Vec<MaskRegion>) -> Vec<MaskRegion> {
    regions.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then_with(|| a.bounding_box.y.total_cmp(&b.bounding_box.y))
            .then_with(|| a.bounding_box.x.total_cmp(&b.bounding_box.x))
    });
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, OcrPage, OcrWord};

    fn word(text: &str, x: f64, y: f64, w: f64, h: f64) -> OcrWord {
        OcrWord::new(text, 0.99, BoundingBox::pixel(1, x, y, w, h).unwrap())
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

    fn run(ocr: &OcrResult, entities: &[PhiEntity], config: &MatcherConfig) -> MatchOutput {
        let index = OffsetIndex::build(ocr, 2);
        match_entities(ocr, &index, entities, config).unwrap()
    }

    #[test]
    fn test_single_word_exact_match() {
        let ocr = single_page(vec![word("John", 100.0, 200.0, 50.0, 20.0)], "John");
        let entities = [PhiEntity::new("John", "Person", 0, 4, 0.95)];
        let output = run(&ocr, &entities, &MatcherConfig::default());

        assert_eq!(output.regions.len(), 1);
        let region = &output.regions[0];
        assert_eq!(region.page, 1);
        assert_eq!(region.category, "Person");
        assert_eq!(region.bounding_box.x, 95.0);
        assert_eq!(region.bounding_box.y, 195.0);
        assert_eq!(region.bounding_box.width, 60.0);
        assert_eq!(region.bounding_box.height, 30.0);
    }

    #[test]
    fn test_two_word_merge() {
        let ocr = single_page(
            vec![
                word("John", 100.0, 200.0, 50.0, 20.0),
                word("Smith", 155.0, 200.0, 60.0, 20.0),
            ],
            "John Smith",
        );
        let entities = [PhiEntity::new("John Smith", "Person", 0, 10, 0.95)];
        let output = run(&ocr, &entities, &MatcherConfig::default());

        assert_eq!(output.regions.len(), 1);
        let bbox = output.regions[0].bounding_box;
        assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (95.0, 195.0, 125.0, 30.0));
    }

    #[test]
    fn test_merge_adjacent_off_emits_per_word_regions() {
        let ocr = single_page(
            vec![
                word("John", 100.0, 200.0, 50.0, 20.0),
                word("Smith", 155.0, 200.0, 60.0, 20.0),
            ],
            "John Smith",
        );
        let entities = [PhiEntity::new("John Smith", "Person", 0, 10, 0.95)];
        let config = MatcherConfig {
            merge_adjacent: false,
            ..Default::default()
        };
        let output = run(&ocr, &entities, &config);
        assert_eq!(output.regions.len(), 2);
    }

    #[test]
    fn test_ocr_error_fuzzy_recovery() {
        let ocr = single_page(vec![word("5amuel", 100.0, 200.0, 70.0, 20.0)], "5amuel");
        let entities = [PhiEntity::new("Samuel", "Person", 0, 6, 0.95)];
        let output = run(&ocr, &entities, &MatcherConfig::default());

        assert_eq!(output.matched(), 1);
        assert_eq!(output.regions.len(), 1);
        let bbox = output.regions[0].bounding_box;
        assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (95.0, 195.0, 80.0, 30.0));
    }

    #[test]
    fn test_page_spanning_entity_two_regions() {
        let ocr = OcrResult {
            pages: vec![
                OcrPage {
                    page_number: 1,
                    width: 1000,
                    height: 1000,
                    words: vec![
                        word("123", 100.0, 900.0, 40.0, 20.0),
                        word("Main", 145.0, 900.0, 55.0, 20.0),
                    ],
                },
                OcrPage {
                    page_number: 2,
                    width: 1000,
                    height: 1000,
                    words: vec![OcrWord::new(
                        "Street",
                        0.98,
                        BoundingBox::pixel(2, 100.0, 50.0, 80.0, 20.0).unwrap(),
                    )],
                },
            ],
            full_text: "123 Main\nStreet".to_string(),
        };
        let entities = [PhiEntity::new("123 Main\nStreet", "Address", 0, 15, 0.9)];
        let output = run(&ocr, &entities, &MatcherConfig::default());

        assert_eq!(output.matched(), 1);
        assert_eq!(output.regions.len(), 2);
        assert_eq!(output.regions[0].page, 1);
        assert_eq!(output.regions[1].page, 2);
        assert!(output.regions.iter().all(|r| r.category == "Address"));
        assert!(output.regions.iter().all(|r| (r.confidence - 0.9).abs() < 1e-9));
    }

    #[test]
    fn test_unmatched_entity_reported_not_fatal() {
        let ocr = single_page(vec![word("Hello", 10.0, 10.0, 50.0, 20.0)], "Hello");
        let entities = [PhiEntity::new("Goodbye", "Person", 0, 7, 0.9)];
        let output = run(&ocr, &entities, &MatcherConfig::default());

        assert!(output.regions.is_empty());
        assert_eq!(output.unmatched(), 1);
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].contains("Person"));
    }

    #[test]
    fn test_confidence_filter_is_silent() {
        let ocr = single_page(vec![word("Hello", 10.0, 10.0, 50.0, 20.0)], "Hello");
        let entities = [PhiEntity::new("Hello", "Person", 0, 5, 0.50)];
        let config = MatcherConfig {
            confidence_threshold: 0.80,
            ..Default::default()
        };
        let output = run(&ocr, &entities, &config);

        assert!(output.regions.is_empty());
        assert_eq!(output.filtered(), 1);
        assert_eq!(output.unmatched(), 0);
        assert!(output.errors.is_empty());
    }

    #[test]
    fn test_drifted_offset_recovered_by_fuzzy_window() {
        // Provider reports the offset two characters early.
        let ocr = single_page(vec![word("Jane", 100.0, 200.0, 50.0, 20.0)], "##Jane");
        let entities = [PhiEntity::new("Jane", "Person", 0, 4, 0.9)];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        assert_eq!(output.matched(), 1);
        assert_eq!(output.regions.len(), 1);
    }

    #[test]
    fn test_aggressive_literal_search_far_from_offset() {
        // Offset points nowhere near the actual occurrence.
        let filler = "x".repeat(40);
        let full_text = format!("{filler} Jane");
        let ocr = single_page(
            vec![
                word(&filler, 0.0, 0.0, 400.0, 20.0),
                word("Jane", 420.0, 0.0, 50.0, 20.0),
            ],
            &full_text,
        );
        let entities = [PhiEntity::new("Jane", "Person", 0, 4, 0.9)];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        assert_eq!(output.matched(), 1);
        assert_eq!(output.regions.len(), 1);
        // The region covers the word "Jane", not the filler.
        assert_eq!(output.regions[0].bounding_box.x, 415.0);
    }

    #[test]
    fn test_duplicate_regions_deduplicated() {
        let ocr = single_page(vec![word("John", 100.0, 200.0, 50.0, 20.0)], "John");
        let entities = [
            PhiEntity::new("John", "Person", 0, 4, 0.95),
            PhiEntity::new("John", "Person", 0, 4, 0.95),
        ];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        assert_eq!(output.matched(), 2);
        assert_eq!(output.regions.len(), 1);
    }

    #[test]
    fn test_overlapping_regions_from_distinct_entities_kept() {
        let ocr = single_page(
            vec![word("John", 100.0, 200.0, 50.0, 20.0), word("Smith", 155.0, 200.0, 60.0, 20.0)],
            "John Smith",
        );
        let entities = [
            PhiEntity::new("John Smith", "Person", 0, 10, 0.95),
            PhiEntity::new("Smith", "Name", 5, 5, 0.90),
        ];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        assert_eq!(output.regions.len(), 2);
    }

    #[test]
    fn test_matching_is_idempotent() {
        let ocr = single_page(
            vec![word("John", 100.0, 200.0, 50.0, 20.0), word("Smith", 155.0, 200.0, 60.0, 20.0)],
            "John Smith",
        );
        let entities = [
            PhiEntity::new("John Smith", "Person", 0, 10, 0.95),
            PhiEntity::new("Nope", "Person", 0, 4, 0.95),
        ];
        let index = OffsetIndex::build(&ocr, 2);
        let a = match_entities(&ocr, &index, &entities, &MatcherConfig::default()).unwrap();
        let b = match_entities(&ocr, &index, &entities, &MatcherConfig::default()).unwrap();
        assert_eq!(a.regions.len(), b.regions.len());
        for (ra, rb) in a.regions.iter().zip(&b.regions) {
            assert_eq!(ra.page, rb.page);
            assert_eq!(ra.bounding_box, rb.bounding_box);
        }
        assert_eq!(a.outcomes, b.outcomes);
    }

    #[test]
    fn test_empty_ocr_all_entities_unmatched() {
        let ocr = single_page(vec![], "");
        let entities = [
            PhiEntity::new("John", "Person", 0, 4, 0.95),
            PhiEntity::new("Smith", "Person", 5, 5, 0.95),
        ];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        assert!(output.regions.is_empty());
        assert_eq!(output.unmatched(), 2);
    }

    #[test]
    fn test_regions_ordered_by_page_y_x() {
        let ocr = OcrResult {
            pages: vec![
                OcrPage {
                    page_number: 1,
                    width: 1000,
                    height: 1000,
                    words: vec![
                        word("lower", 100.0, 500.0, 50.0, 20.0),
                        word("upper", 100.0, 100.0, 50.0, 20.0),
                    ],
                },
                OcrPage {
                    page_number: 2,
                    width: 1000,
                    height: 1000,
                    words: vec![OcrWord::new(
                        "other",
                        0.9,
                        BoundingBox::pixel(2, 10.0, 10.0, 50.0, 20.0).unwrap(),
                    )],
                },
            ],
            full_text: "lower upper other".to_string(),
        };
        let entities = [
            PhiEntity::new("other", "Person", 12, 5, 0.9),
            PhiEntity::new("lower", "Person", 0, 5, 0.9),
            PhiEntity::new("upper", "Person", 6, 5, 0.9),
        ];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        assert_eq!(output.regions.len(), 3);
        assert_eq!(output.regions[0].page, 1);
        assert!(output.regions[0].bounding_box.y < output.regions[1].bounding_box.y);
        assert_eq!(output.regions[2].page, 2);
    }

    #[test]
    fn test_padding_zero_covers_word_boxes() {
        let ocr = single_page(
            vec![word("John", 100.0, 200.0, 50.0, 20.0), word("Smith", 155.0, 200.0, 60.0, 20.0)],
            "John Smith",
        );
        let entities = [PhiEntity::new("John Smith", "Person", 0, 10, 0.95)];
        let config = MatcherConfig {
            padding_px: 0,
            ..Default::default()
        };
        let output = run(&ocr, &entities, &config);
        let region = &output.regions[0];
        for w in &ocr.pages[0].words {
            let b = w.bounding_box;
            assert!(region.bounding_box.x <= b.x);
            assert!(region.bounding_box.y <= b.y);
            assert!(region.bounding_box.right() >= b.right());
            assert!(region.bounding_box.bottom() >= b.bottom());
        }
    }

    #[test]
    fn test_normalized_words_padded_in_page_fractions() {
        let ocr = OcrResult {
            pages: vec![OcrPage {
                page_number: 1,
                width: 1000,
                height: 500,
                words: vec![OcrWord::new(
                    "Jane",
                    0.9,
                    BoundingBox::normalized(1, 0.1, 0.2, 0.05, 0.04).unwrap(),
                )],
            }],
            full_text: "Jane".to_string(),
        };
        let entities = [PhiEntity::new("Jane", "Person", 0, 4, 0.9)];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        let bbox = output.regions[0].bounding_box;
        assert_eq!(bbox.space, CoordinateSpace::Normalized);
        // 5 px on a 1000 x 500 page.
        assert!((bbox.x - (0.1 - 0.005)).abs() < 1e-9);
        assert!((bbox.y - (0.2 - 0.01)).abs() < 1e-9);
    }

    #[test]
    fn test_entity_offset_at_text_end_resolves() {
        let ocr = single_page(
            vec![word("intro", 0.0, 0.0, 40.0, 12.0), word("Doe", 50.0, 0.0, 30.0, 12.0)],
            "intro Doe",
        );
        let entities = [PhiEntity::new("Doe", "Person", 6, 3, 0.9)];
        let output = run(&ocr, &entities, &MatcherConfig::default());
        assert_eq!(output.matched(), 1);
    }
}
