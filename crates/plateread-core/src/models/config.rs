//! Configuration structures for the label pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::label::BrandBoundary;

/// Main configuration for the plateread pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatereadConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Where uploaded objects live locally.
    pub storage: StorageConfig,

    /// Record store configuration.
    pub store: StoreConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Which OCR engine backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrEngineKind {
    /// `pure-onnx-ocr` over the image itself.
    #[default]
    Pure,
    /// Pre-transcribed text stored next to the image.
    Sidecar,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine to use.
    pub engine: OcrEngineKind,

    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,

    /// Extension appended to the object name to find its sidecar transcription.
    pub sidecar_extension: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::default(),
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            sidecar_extension: "txt".to_string(),
        }
    }
}

/// Local stand-in for the bucket namespace: objects live at `root/bucket/name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("buckets"),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON document holding all records.
    pub path: PathBuf,

    /// Key path overwritten with each new result.
    pub record_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("records.json"),
            record_path: "images/mostRecent".to_string(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Which whitespace boundary before `TM` delimits the brand.
    pub brand_boundary: BrandBoundary,
}

impl PlatereadConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_dir.join(model_name)
    }
}
