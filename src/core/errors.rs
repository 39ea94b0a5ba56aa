//! Error types for the page-scanning pipeline.
//!
//! This module defines the errors that can occur while processing a page,
//! from image loading through detection, recognition, and document synthesis.
//! Geometric degeneracies (zero-area boxes, out-of-bounds crops) are never
//! errors; they are silently dropped by the stages that encounter them.

use thiserror::Error;

/// Enum representing the errors that can occur in the pipeline.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred inside a model inference call.
    #[error("inference")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error from the document backend.
    #[error("document backend: {message}")]
    Document {
        /// A message describing the backend failure.
        message: String,
    },

    /// A page-level failure wrapping the underlying cause with the source
    /// path of the page that failed.
    #[error("page {path} failed")]
    Page {
        /// The source path identifying the failed page.
        path: String,
        /// The original failure, preserved for diagnostics.
        #[source]
        source: Box<OcrError>,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for pipeline operations.
pub type OcrResult<T> = Result<T, OcrError>;

impl OcrError {
    /// Wraps a model failure as an inference error.
    pub fn inference(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Inference(Box::new(error))
    }

    /// Creates an invalid-input error with the given message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a document backend error with the given message.
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Wraps an error as a page-level failure carrying the source path of
    /// the page, preserving the original cause.
    pub fn page(path: impl Into<String>, source: OcrError) -> Self {
        Self::Page {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
