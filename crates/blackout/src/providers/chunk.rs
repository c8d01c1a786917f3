//! Transparent chunking for size-limited PHI providers.

use async_trait::async_trait;

use crate::types::{MaskingPolicy, PhiEntity};
use crate::Result;

use super::PhiProvider;

/// Wraps a [`PhiProvider`] with a maximum input length, splitting
/// `full_text` into chunks and re-basing the returned offsets so callers
/// see positions relative to the original string.
///
/// Chunk boundaries prefer whitespace in the trailing half of the chunk so
/// an entity is unlikely to straddle two requests.
pub struct ChunkedPhiProvider<P> {
    inner: P,
    max_chunk_len: usize,
}

impl<P> ChunkedPhiProvider<P> {
    /// `max_chunk_len` is in characters and must be nonzero.
    pub fn new(inner: P, max_chunk_len: usize) -> Self {
        Self {
            inner,
            max_chunk_len: max_chunk_len.max(1),
        }
    }
}

/// Split `text` into `(base_offset, chunk)` pairs of at most `max_len`
/// characters, preferring to break at whitespace past the midpoint.
fn chunk_spans(text: &str, max_len: usize) -> Vec<(usize, String)> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut start = 0usize;
    while start < chars.len() {
        let hard_end = (start + max_len).min(chars.len());
        let mut end = hard_end;
        if hard_end < chars.len() {
            // Backtrack to the last whitespace, but never past the midpoint.
            let floor = start + max_len / 2;
            if let Some(ws) = (floor..hard_end).rev().find(|&i| chars[i].is_whitespace()) {
                end = ws + 1;
            }
        }
        spans.push((start, chars[start..end].iter().collect()));
        start = end;
    }
    spans
}

#[async_trait]
impl<P: PhiProvider> PhiProvider for ChunkedPhiProvider<P> {
    async fn detect(&self, full_text: &str, policy: &MaskingPolicy) -> Result<Vec<PhiEntity>> {
        if full_text.chars().count() <= self.max_chunk_len {
            return self.inner.detect(full_text, policy).await;
        }

        let mut entities = Vec::new();
        for (base, chunk) in chunk_spans(full_text, self.max_chunk_len) {
            let mut found = self.inner.detect(&chunk, policy).await?;
            for entity in &mut found {
                entity.offset += base;
            }
            entities.extend(found);
        }
        Ok(entities)
    }
}
