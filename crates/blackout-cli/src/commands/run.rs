//! Run command - de-identify one document from recorded provider output.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use blackout::providers::{StaticOcrProvider, StaticPhiProvider};
use blackout::types::{OcrResult, PhiEntity, RunStatus};
use blackout::{Deidentifier, DocumentFormat};

#[allow(clippy::too_many_arguments)]
pub async fn run_command(
    input: PathBuf,
    ocr: PathBuf,
    phi: PathBuf,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
    config: Option<PathBuf>,
    debug_masks: bool,
) -> Result<()> {
    let mut config = super::load_config(config.as_deref())?;
    if debug_masks {
        config.debug_mode = true;
    }

    let document = std::fs::read(&input).with_context(|| format!("failed to read '{}'", input.display()))?;
    let format = detect_format(&input, &document)?;

    let ocr_raw = std::fs::read_to_string(&ocr).with_context(|| format!("failed to read '{}'", ocr.display()))?;
    let ocr_result: OcrResult =
        serde_json::from_str(&ocr_raw).with_context(|| format!("invalid OCR JSON in '{}'", ocr.display()))?;

    let phi_raw = std::fs::read_to_string(&phi).with_context(|| format!("failed to read '{}'", phi.display()))?;
    let entities: Vec<PhiEntity> =
        serde_json::from_str(&phi_raw).with_context(|| format!("invalid PHI JSON in '{}'", phi.display()))?;

    let engine = Deidentifier::with_raster_io(
        Arc::new(StaticOcrProvider::new(ocr_result)),
        Arc::new(StaticPhiProvider::new(entities)),
    );
    let result = engine
        .run_to_report(Bytes::from(document), format, &config, CancellationToken::new())
        .await;

    if let Some(report_path) = report {
        let json = serde_json::to_string_pretty(&result.report).context("failed to serialize run report")?;
        std::fs::write(&report_path, json)
            .with_context(|| format!("failed to write report '{}'", report_path.display()))?;
    }

    match result.report.status {
        RunStatus::Success => {
            let output = output.unwrap_or_else(|| masked_path(&input, format));
            std::fs::write(&output, &result.masked_document)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            eprintln!(
                "masked {} region(s) across {} page(s) -> {}",
                result.report.counts.regions_produced,
                result.report.counts.pages_processed,
                output.display()
            );
            if result.report.counts.entities_unmatched > 0 {
                eprintln!(
                    "warning: {} entit(ies) could not be located",
                    result.report.counts.entities_unmatched
                );
            }
            Ok(())
        }
        RunStatus::Failure => {
            bail!("de-identification failed: {}", result.report.errors.join("; "))
        }
    }
}

fn detect_format(input: &std::path::Path, data: &[u8]) -> Result<DocumentFormat> {
    if let Some(format) = DocumentFormat::from_bytes(data) {
        return Ok(format);
    }
    input
        .extension()
        .and_then(|e| e.to_str())
        .and_then(DocumentFormat::from_extension)
        .with_context(|| format!("cannot determine document format of '{}'", input.display()))
}

fn masked_path(input: &std::path::Path, format: DocumentFormat) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    input.with_file_name(format!("{stem}.masked.{}", format.as_str()))
}
