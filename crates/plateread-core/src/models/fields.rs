//! Extracted label fields and the stored record shape.

use serde::{Deserialize, Serialize};

/// Fields derived from one OCR transcription.
///
/// Built once per raw text and never mutated. Writing it to a record store
/// replaces whatever was stored before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Raw OCR transcription (may be empty).
    pub raw: String,

    /// Brand name, `"EATON"` when nothing better was found.
    pub brand: String,

    /// Catalogue number (best-effort substring, may be empty).
    pub catalogue: String,

    /// General/purchase order number, `"No ORDER found"` when absent.
    #[serde(rename = "orderNum")]
    pub order_num: String,
}

/// Document written to the record store: `{ "text": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub text: ExtractedFields,
}

impl From<ExtractedFields> for LabelRecord {
    fn from(text: ExtractedFields) -> Self {
        Self { text }
    }
}
