//! Inspect command - print the offset index for recorded OCR output.
//!
//! Handy when diagnosing provider drift: shows per word how (and whether)
//! the index builder located it in `full_text`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use blackout::index::OffsetIndex;
use blackout::types::OcrResult;

pub fn inspect_command(ocr: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config.as_deref())?;

    let raw = std::fs::read_to_string(&ocr).with_context(|| format!("failed to read '{}'", ocr.display()))?;
    let ocr_result: OcrResult =
        serde_json::from_str(&raw).with_context(|| format!("invalid OCR JSON in '{}'", ocr.display()))?;
    ocr_result.validate().context("OCR result failed validation")?;

    let index = OffsetIndex::build(&ocr_result, config.fuzzy_word_threshold);
    println!(
        "{}",
        serde_json::to_string_pretty(index.entries()).context("failed to serialize index")?
    );
    eprintln!(
        "{} word(s), {} unresolved",
        index.len(),
        index.unresolved_count()
    );
    Ok(())
}
