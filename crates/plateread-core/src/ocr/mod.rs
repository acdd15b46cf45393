//! OCR service interface and engines.

#[cfg(feature = "native")]
mod pure_engine;
mod sidecar;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrService;
pub use sidecar::SidecarTextService;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::config::{OcrEngineKind, PlatereadConfig};
use crate::models::event::ObjectLocation;

/// Best-effort transcription of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Full recognized text, lines joined with newlines.
    pub description: String,

    /// Mean recognition confidence (0.0 - 1.0), when the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl TextAnnotation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            confidence: None,
        }
    }
}

/// Converts an uploaded image into text.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Detect text in the object. `None` when the image holds no text.
    async fn detect_text(
        &self,
        location: &ObjectLocation,
    ) -> Result<Option<TextAnnotation>, OcrError>;
}

/// Local path of an object: `root/bucket/name`.
pub fn object_path(root: &Path, location: &ObjectLocation) -> PathBuf {
    root.join(&location.bucket).join(&location.name)
}

/// Build the OCR service selected in the configuration.
pub fn engine_from_config(config: &PlatereadConfig) -> Result<Arc<dyn OcrService>, OcrError> {
    match config.ocr.engine {
        OcrEngineKind::Sidecar => Ok(Arc::new(SidecarTextService::new(
            &config.storage.root,
            &config.ocr.sidecar_extension,
        ))),
        #[cfg(feature = "native")]
        OcrEngineKind::Pure => Ok(Arc::new(PureOcrService::from_config(config)?)),
        #[cfg(not(feature = "native"))]
        OcrEngineKind::Pure => Err(OcrError::UnknownEngine(
            "pure (built without the native feature)".to_string(),
        )),
    }
}
