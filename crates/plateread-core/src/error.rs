//! Error types for the plateread-core library.

use thiserror::Error;

/// Main error type for the plateread library.
#[derive(Error, Debug)]
pub enum PlatereadError {
    /// The incoming event was rejected before any service was called.
    #[error("invalid event: {0}")]
    Validation(#[from] ValidationError),

    /// OCR service failure.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Record store write failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while validating a storage event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(r#"Bucket not provided. Make sure you have a "bucket" property in your request"#)]
    MissingBucket,

    #[error(r#"Filename not provided. Make sure you have a "name" property in your request"#)]
    MissingFilename,

    /// The event payload could not be decoded.
    #[error("malformed event: {0}")]
    Malformed(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The referenced object does not exist under the storage root.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The object could not be read or decoded.
    #[error("failed to read object {location}: {reason}")]
    Read { location: String, reason: String },

    /// Text detection or recognition failed.
    #[error("text detection failed: {0}")]
    Detection(String),

    /// Unknown engine name in configuration.
    #[error("unknown OCR engine: {0}")]
    UnknownEngine(String),
}

/// Errors related to record store writes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing document could not be read or written.
    #[error("failed to write record at {path}: {reason}")]
    Write { path: String, reason: String },

    /// The existing document is not valid JSON.
    #[error("corrupt record document: {0}")]
    Corrupt(String),

    /// The record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for the plateread library.
pub type Result<T> = std::result::Result<T, PlatereadError>;
