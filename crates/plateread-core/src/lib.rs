//! Core library for equipment label OCR processing.
//!
//! This crate provides:
//! - Heuristic label field extraction (brand, catalogue number, order number)
//! - OCR service interface with pure Rust and sidecar-text engines
//! - Record stores that overwrite a result under a key path
//! - The upload event handler tying OCR, extraction and storage together

pub mod error;
pub mod handler;
pub mod label;
pub mod models;
pub mod ocr;
pub mod store;

pub use error::{OcrError, PlatereadError, Result, StoreError, ValidationError};
pub use handler::{ImageHandler, Outcome};
pub use label::{BrandBoundary, LabelParser};
pub use label::rules::{
    extract_brand, extract_catalogue_number, extract_order_number, truncate_at_first_whitespace,
};
pub use models::event::{ObjectLocation, StorageEvent};
pub use models::fields::{ExtractedFields, LabelRecord};
pub use ocr::{OcrService, TextAnnotation, engine_from_config};
pub use store::{JsonFileStore, MemoryStore, RecordStore};

#[cfg(feature = "native")]
pub use ocr::PureOcrService;
