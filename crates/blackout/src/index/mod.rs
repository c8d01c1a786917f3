//! Offset index: aligns every OCR word to its character span in `full_text`.
//!
//! OCR text and the concatenated `full_text` come from the same provider
//! but can disagree on whitespace handling and the occasional glyph. The
//! builder walks `full_text` with a single left-to-right cursor and tries,
//! per word, an exact match, a whitespace-normalized match, and a bounded
//! fuzzy match. Words that still fail are recorded as unresolved rather
//! than aborting the walk; the produced list always has one entry per word,
//! in page/reading order, with monotonically nondecreasing starts.

use serde::Serialize;
use tracing::{debug, warn};

use crate::matcher::distance::bounded_levenshtein;
use crate::types::OcrResult;

/// How a word's span in `full_text` was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordResolution {
    /// Verbatim substring at the cursor.
    Exact,
    /// Matched after collapsing whitespace runs on both sides.
    Normalized,
    /// Located within the forward window by bounded edit distance.
    Fuzzy,
    /// Could not be located; `start == end` and the word is invisible to
    /// range queries.
    Unresolved,
}

/// Character span of one OCR word in `full_text`, with back-pointers to the
/// word's position in the [`OcrResult`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WordOffset {
    /// Inclusive start, a character offset into `full_text`.
    pub start: usize,
    /// Exclusive end.
    pub end: usize,
    /// 1-based page number of the word.
    pub page_number: u32,
    /// Index of the page within `OcrResult::pages`.
    pub page_index: usize,
    /// Index of the word within its page.
    pub word_index: usize,
    pub resolution: WordResolution,
}

impl WordOffset {
    pub fn is_resolved(&self) -> bool {
        self.resolution != WordResolution::Unresolved
    }
}

/// The built index: one [`WordOffset`] per word plus the shared character
/// view of `full_text` used for all offset arithmetic.
#[derive(Debug, Clone)]
pub struct OffsetIndex {
    entries: Vec<WordOffset>,
    chars: Vec<char>,
}

/// Whitespace-like characters skipped between words: space, tab, newline,
/// carriage return, form feed, and NBSP.
fn is_word_gap(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}' | '\u{00A0}')
}

impl OffsetIndex {
    /// Build the index for an OCR result.
    ///
    /// `fuzzy_word_threshold` bounds the edit distance of the fuzzy stage;
    /// it is additionally capped at half the word length so short words
    /// cannot drift onto unrelated text.
    pub fn build(ocr: &OcrResult, fuzzy_word_threshold: usize) -> Self {
        let chars: Vec<char> = ocr.full_text.chars().collect();
        let mut entries = Vec::with_capacity(ocr.word_count());
        let mut cursor = 0usize;

        for (page_index, page) in ocr.pages.iter().enumerate() {
            for (word_index, word) in page.words.iter().enumerate() {
                while cursor < chars.len() && is_word_gap(chars[cursor]) {
                    cursor += 1;
                }

                let word_chars: Vec<char> = word.text.chars().collect();
                let located = locate_word(&chars, cursor, &word_chars, fuzzy_word_threshold);

                let offset = match located {
                    Some((start, end, resolution)) => {
                        cursor = end;
                        WordOffset {
                            start,
                            end,
                            page_number: page.page_number,
                            page_index,
                            word_index,
                            resolution,
                        }
                    }
                    None => {
                        warn!(
                            page = page.page_number,
                            word = %word.text,
                            cursor,
                            "word could not be located in full_text"
                        );
                        WordOffset {
                            start: cursor,
                            end: cursor,
                            page_number: page.page_number,
                            page_index,
                            word_index,
                            resolution: WordResolution::Unresolved,
                        }
                    }
                };
                entries.push(offset);
            }
        }

        debug!(
            words = entries.len(),
            unresolved = entries.iter().filter(|e| !e.is_resolved()).count(),
            "offset index built"
        );
        Self { entries, chars }
    }

    pub fn entries(&self) -> &[WordOffset] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Character view of `full_text` shared with the matcher.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn unresolved_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_resolved()).count()
    }

    /// Resolved entries whose span overlaps `[start, end)`.
    ///
    /// Unresolved entries are empty spans and never overlap anything.
    pub fn overlapping(&self, start: usize, end: usize) -> Vec<&WordOffset> {
        self.entries
            .iter()
            .filter(|e| e.is_resolved() && e.start < end && e.end > start)
            .collect()
    }
}

/// Try the three location stages for one word at the cursor.
///
/// Returns `(start, end, resolution)` with `end` the new cursor position.
fn locate_word(
    chars: &[char],
    cursor: usize,
    word: &[char],
    fuzzy_threshold: usize,
) -> Option<(usize, usize, WordResolution)> {
    // Exact substring at the cursor.
    if chars[cursor.min(chars.len())..].starts_with(word) {
        return Some((cursor, cursor + word.len(), WordResolution::Exact));
    }

    // Whitespace-normalized comparison from the cursor.
    if let Some(consumed) = normalized_match(&chars[cursor.min(chars.len())..], word) {
        return Some((cursor, cursor + consumed, WordResolution::Normalized));
    }

    // Fuzzy: best bounded-distance position within the forward window.
    let threshold = fuzzy_threshold.min(word.len() / 2);
    let window = (2 * word.len()).max(16);
    let last_start = (cursor + window).min(chars.len());
    let mut best: Option<(usize, usize)> = None; // (distance, position)
    for pos in cursor..=last_start {
        let slice_end = (pos + word.len()).min(chars.len());
        let candidate = &chars[pos.min(chars.len())..slice_end];
        if let Some(distance) = bounded_levenshtein(candidate, word, threshold) {
            let better = match best {
                Some((best_distance, _)) => distance < best_distance,
                None => true,
            };
            if better {
                best = Some((distance, pos));
                if distance == 0 {
                    break;
                }
            }
        }
    }

    best.map(|(_, pos)| {
        let end = (pos + word.len()).min(chars.len());
        (pos, end, WordResolution::Fuzzy)
    })
}

/// Compare `word` against the head of `text` while collapsing whitespace
/// runs on both sides to a single separator. Returns the number of text
/// characters consumed on success.
fn normalized_match(text: &[char], word: &[char]) -> Option<usize> {
    let mut ti = 0usize;
    let mut wi = 0usize;
    while wi < word.len() {
        let wc = word[wi];
        if is_word_gap(wc) {
            // Both sides must have a whitespace run here; collapse each.
            if ti >= text.len() || !is_word_gap(text[ti]) {
                return None;
            }
            while wi < word.len() && is_word_gap(word[wi]) {
                wi += 1;
            }
            while ti < text.len() && is_word_gap(text[ti]) {
                ti += 1;
            }
        } else {
            if ti >= text.len() || text[ti] != wc {
                return None;
            }
            ti += 1;
            wi += 1;
        }
    }
    Some(ti)
}
