//! OCR service that reads pre-transcribed text stored next to each image.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::OcrError;
use crate::models::event::ObjectLocation;

use super::{object_path, OcrService, TextAnnotation};

/// Reads `root/bucket/name.<extension>` as the image transcription.
///
/// A missing sidecar means the image carries no text.
#[derive(Debug, Clone)]
pub struct SidecarTextService {
    root: PathBuf,
    extension: String,
}

impl SidecarTextService {
    pub fn new(root: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    fn sidecar_path(&self, location: &ObjectLocation) -> PathBuf {
        let mut path = object_path(&self.root, location).into_os_string();
        path.push(".");
        path.push(&self.extension);
        PathBuf::from(path)
    }
}

#[async_trait]
impl OcrService for SidecarTextService {
    async fn detect_text(
        &self,
        location: &ObjectLocation,
    ) -> Result<Option<TextAnnotation>, OcrError> {
        let path = self.sidecar_path(location);

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                debug!("Read {} bytes of sidecar text from {}", text.len(), path.display());
                Ok(Some(TextAnnotation::new(text)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No sidecar text at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(OcrError::Read {
                location: location.uri(),
                reason: e.to_string(),
            }),
        }
    }
}
