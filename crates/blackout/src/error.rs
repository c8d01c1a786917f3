//! Error types for the de-identification engine.

use thiserror::Error;

/// Boxed source error carried by boundary conversions.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the de-identification core.
///
/// Collaborator failures (document I/O, OCR, PHI detection) are converted
/// into these variants at the boundary; provider-specific error types never
/// cross it. Unmatched entities are deliberately NOT an error variant: they
/// are counted and reported in [`DeidentifyReport::errors`](crate::types::DeidentifyReport)
/// while the run still succeeds.
#[derive(Debug, Error)]
pub enum BlackoutError {
    /// The caller requested abort via the cancellation token.
    #[error("operation cancelled")]
    Cancelled,

    /// Document bytes were unreadable or the format unsupported. Fatal.
    #[error("failed to load document: {message}")]
    DocumentLoad {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The OCR collaborator failed.
    #[error("OCR provider error: {message}")]
    OcrProvider {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The PHI-detection collaborator failed.
    #[error("PHI provider error: {message}")]
    PhiProvider {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// A word or page carries negative or non-finite dimensions. Fatal.
    #[error("invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// Re-encoding the masked pages failed. Fatal for the request.
    #[error("failed to encode masked document: {message}")]
    ImageEncode {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Configuration could not be parsed or is out of domain.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BlackoutError>;
