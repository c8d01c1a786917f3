//! Pipeline orchestration: load, OCR, index, detect, match, paint, save.
//!
//! Processing is single-document and single-threaded; only collaborator
//! calls suspend. The cancellation token is observed at every phase
//! boundary and raced against the collaborator futures, so a cancelled run
//! never persists partial state; the page buffers simply drop.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DeidentifyConfig;
use crate::document::{DocumentFormat, DocumentIo, RasterIo};
use crate::index::OffsetIndex;
use crate::mask::paint_regions;
use crate::matcher::match_entities;
use crate::providers::{OcrProvider, PhiProvider};
use crate::types::{
    DeidentificationResult, DeidentifyCounts, DeidentifyReport, RunStatus,
};
use crate::{BlackoutError, Result};

/// The de-identification engine, assembled from its three collaborators.
///
/// Providers are composed at construction and treated as read-only
/// callables; one engine may serve many documents concurrently from
/// separate tasks because no per-document state lives on it.
pub struct Deidentifier {
    ocr: Arc<dyn OcrProvider>,
    phi: Arc<dyn PhiProvider>,
    io: Arc<dyn DocumentIo>,
}

impl Deidentifier {
    pub fn new(ocr: Arc<dyn OcrProvider>, phi: Arc<dyn PhiProvider>, io: Arc<dyn DocumentIo>) -> Self {
        Self { ocr, phi, io }
    }

    /// Construct with the bundled raster TIFF/PNG document I/O.
    pub fn with_raster_io(ocr: Arc<dyn OcrProvider>, phi: Arc<dyn PhiProvider>) -> Self {
        Self::new(ocr, phi, Arc::new(RasterIo))
    }

    /// Run the pipeline, returning a hard error on fatal failure.
    ///
    /// Recoverable anomalies (unmatched entities, unresolved words) do not
    /// fail the run; they surface in the report's counts and error list
    /// with `status` still [`RunStatus::Success`].
    pub async fn run(
        &self,
        document: Bytes,
        format: DocumentFormat,
        config: &DeidentifyConfig,
        cancel: CancellationToken,
    ) -> Result<DeidentificationResult> {
        config.validate()?;
        let started = Instant::now();

        let (pages, metadata) = race_cancel(&cancel, self.io.load(&document, format)).await?;
        ensure_live(&cancel)?;
        debug!(pages = pages.len(), format = format.as_str(), "document loaded");

        let ocr_payload = race_cancel(
            &cancel,
            self.io
                .optimize_for_ocr(&pages, &metadata, format, config.max_ocr_size_mb),
        )
        .await?;
        let ocr_result = race_cancel(
            &cancel,
            self.ocr.analyze(&ocr_payload, format, &config.language),
        )
        .await?;
        ocr_result.validate()?;
        ensure_live(&cancel)?;

        let index = OffsetIndex::build(&ocr_result, config.fuzzy_word_threshold);
        ensure_live(&cancel)?;

        let entities = race_cancel(
            &cancel,
            self.phi.detect(&ocr_result.full_text, &config.policy()),
        )
        .await?;
        ensure_live(&cancel)?;
        debug!(entities = entities.len(), "PHI detection complete");

        let output = match_entities(&ocr_result, &index, &entities, &config.matcher())?;
        ensure_live(&cancel)?;

        // OCR-reported page dimensions are authoritative for normalized
        // scaling; fall back to the loaded image when a page is missing.
        let scale_dims: Vec<(f64, f64)> = pages
            .iter()
            .enumerate()
            .map(|(i, img)| {
                ocr_result
                    .pages
                    .iter()
                    .find(|p| p.page_number == (i + 1) as u32)
                    .filter(|p| p.width > 0 && p.height > 0)
                    .map(|p| (f64::from(p.width), f64::from(p.height)))
                    .unwrap_or((f64::from(img.width()), f64::from(img.height())))
            })
            .collect();

        let masked = paint_regions(&pages, &output.regions, &scale_dims, &config.painter());
        let encoded = race_cancel(&cancel, self.io.save(&masked, &metadata, format)).await?;

        let counts = DeidentifyCounts {
            pages_processed: pages.len(),
            entities_detected: entities.len(),
            entities_filtered: output.filtered(),
            entities_unmatched: output.unmatched(),
            regions_produced: output.regions.len(),
            words_unresolved: index.unresolved_count(),
        };
        if counts.entities_unmatched > 0 {
            warn!(
                unmatched = counts.entities_unmatched,
                detected = counts.entities_detected,
                "document produced with unmatched entities"
            );
        }
        info!(
            pages = counts.pages_processed,
            regions = counts.regions_produced,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "de-identification complete"
        );

        Ok(DeidentificationResult {
            report: DeidentifyReport {
                status: RunStatus::Success,
                counts,
                regions: output.regions,
                elapsed_ms: started.elapsed().as_millis() as u64,
                errors: output.errors,
            },
            masked_document: Bytes::from(encoded),
            pages: masked,
        })
    }

    /// Run the pipeline and fold any fatal error into the result envelope:
    /// `status` becomes [`RunStatus::Failure`] and the masked bytes stay
    /// empty, mirroring what a job runner would persist.
    pub async fn run_to_report(
        &self,
        document: Bytes,
        format: DocumentFormat,
        config: &DeidentifyConfig,
        cancel: CancellationToken,
    ) -> DeidentificationResult {
        let started = Instant::now();
        match self.run(document, format, config, cancel).await {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, "de-identification failed");
                DeidentificationResult {
                    report: DeidentifyReport::failure(error.to_string(), started.elapsed().as_millis() as u64),
                    masked_document: Bytes::new(),
                    pages: Vec::new(),
                }
            }
        }
    }
}

/// Convenience entry point: de-identify one document with the bundled
/// raster document I/O and a fresh cancellation token.
///
/// Equivalent to assembling a [`Deidentifier`] over [`RasterIo`] and
/// calling [`Deidentifier::run`]; callers that need cancellation, a custom
/// document codec, or the failure-envelope shape use the engine directly.
pub async fn deidentify(
    ocr: Arc<dyn OcrProvider>,
    phi: Arc<dyn PhiProvider>,
    document: Bytes,
    format: DocumentFormat,
    config: &DeidentifyConfig,
) -> Result<DeidentificationResult> {
    Deidentifier::with_raster_io(ocr, phi)
        .run(document, format, config, CancellationToken::new())
        .await
}

fn ensure_live(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(BlackoutError::Cancelled);
    }
    Ok(())
}

/// Race a collaborator future against cancellation; dropping the future on
/// cancel is how the signal is forwarded to the collaborator.
async fn race_cancel<T>(
    cancel: &CancellationToken,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BlackoutError::Cancelled),
        out = fut => out,
    }
}
