//! OCR service backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
//!
//! The engine keeps per-shape plan caches in `RefCell`s and cannot cross
//! threads, so it is built on and owned by a dedicated worker thread. Requests
//! reach it over a channel and answers come back on a oneshot.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use async_trait::async_trait;
use image::GenericImageView;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::OcrError;
use crate::models::config::{OcrConfig, PlatereadConfig};
use crate::models::event::ObjectLocation;

use super::{object_path, OcrService, TextAnnotation};

/// Recognized line with its top-left corner, used for reading order.
struct Line {
    x: f64,
    y: f64,
    text: String,
    confidence: f32,
}

/// One image for the worker, and where to send its lines.
struct Job {
    path: PathBuf,
    reply: oneshot::Sender<Result<Vec<Line>, OcrError>>,
}

/// Model files the worker loads the engine from.
#[derive(Debug, Clone)]
struct ModelFiles {
    detection: PathBuf,
    recognition: PathBuf,
    dictionary: PathBuf,
}

impl ModelFiles {
    fn in_dir(config: &OcrConfig) -> Self {
        Self {
            detection: config.model_dir.join(&config.detection_model),
            recognition: config.model_dir.join(&config.recognition_model),
            dictionary: config.model_dir.join(&config.dictionary),
        }
    }

    fn check(&self) -> Result<(), OcrError> {
        for path in [&self.detection, &self.recognition, &self.dictionary] {
            if !path.is_file() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    fn build(&self) -> Result<pure_onnx_ocr::engine::OcrEngine, OcrError> {
        pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&self.detection)
            .rec_model_path(&self.recognition)
            .dictionary_path(&self.dictionary)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))
    }
}

/// Runs detection and recognition over images under a storage root.
///
/// Dropping the service closes the job channel, which stops the worker.
pub struct PureOcrService {
    jobs: mpsc::UnboundedSender<Job>,
    root: PathBuf,
}

impl PureOcrService {
    /// Load the models named in `config` and start the worker thread.
    ///
    /// Returns once the engine is built, so model errors surface here rather
    /// than on the first image.
    pub fn new(config: &OcrConfig, root: impl AsRef<Path>) -> Result<Self, OcrError> {
        let models = ModelFiles::in_dir(config);
        models.check()?;

        let jobs = spawn_worker(models, config.keep_unk)?;
        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            jobs,
            root: root.as_ref().to_path_buf(),
        })
    }

    /// Create a service from the OCR and storage sections of the configuration.
    pub fn from_config(config: &PlatereadConfig) -> Result<Self, OcrError> {
        Self::new(&config.ocr, &config.storage.root)
    }
}

fn spawn_worker(
    models: ModelFiles,
    keep_unk: bool,
) -> Result<mpsc::UnboundedSender<Job>, OcrError> {
    let (jobs_tx, mut jobs_rx) = mpsc::unbounded_channel::<Job>();
    let (ready_tx, ready_rx) = std::sync::mpsc::channel();

    thread::Builder::new()
        .name("pure-onnx-ocr".to_string())
        .spawn(move || {
            let engine = match models.build() {
                Ok(engine) => {
                    let _ = ready_tx.send(Ok(()));
                    engine
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            while let Some(job) = jobs_rx.blocking_recv() {
                let lines = recognize(&engine, &job.path, keep_unk);
                if job.reply.send(lines).is_err() {
                    warn!("OCR caller went away before {} finished", job.path.display());
                }
            }
            debug!("OCR worker stopped");
        })
        .map_err(|e| OcrError::ModelLoad(format!("could not start OCR worker: {}", e)))?;

    ready_rx
        .recv()
        .map_err(|_| OcrError::ModelLoad("OCR worker exited while loading models".to_string()))??;

    Ok(jobs_tx)
}

fn recognize(
    engine: &pure_onnx_ocr::engine::OcrEngine,
    path: &Path,
    keep_unk: bool,
) -> Result<Vec<Line>, OcrError> {
    let image = image::open(path).map_err(|e| OcrError::Read {
        location: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let (width, height) = image.dimensions();
    debug!("Processing image: {}x{}", width, height);

    let results = engine
        .run_from_image(&image)
        .map_err(|e| OcrError::Detection(format!("pure-onnx-ocr: {}", e)))?;

    debug!("pure-onnx-ocr returned {} text regions", results.len());

    Ok(results
        .iter()
        .map(|r| {
            let (x, y) = top_left(&r.bounding_box);
            let text = if keep_unk {
                r.text.clone()
            } else {
                r.text.replace("[UNK]", " ")
            };
            Line {
                x,
                y,
                text,
                confidence: r.confidence,
            }
        })
        .collect())
}

#[async_trait]
impl OcrService for PureOcrService {
    async fn detect_text(
        &self,
        location: &ObjectLocation,
    ) -> Result<Option<TextAnnotation>, OcrError> {
        let start = Instant::now();
        let path = object_path(&self.root, location);

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(OcrError::NotFound(location.uri()));
        }

        let (reply, answer) = oneshot::channel();
        self.jobs
            .send(Job { path, reply })
            .map_err(|_| OcrError::Detection("OCR worker is not running".to_string()))?;
        let mut lines = answer
            .await
            .map_err(|_| OcrError::Detection("OCR worker dropped the request".to_string()))??;

        if lines.is_empty() {
            return Ok(None);
        }

        sort_by_reading_order(&mut lines);

        let confidence = lines.iter().map(|l| l.confidence).sum::<f32>() / lines.len() as f32;
        let description = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            "OCR complete: {} lines in {}ms",
            lines.len(),
            start.elapsed().as_millis()
        );

        Ok(Some(TextAnnotation {
            description,
            confidence: Some(confidence),
        }))
    }
}

/// Top-left corner of a region polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| (x.min(c.x), y.min(c.y)))
}

/// Top-to-bottom in 20px rows, then left-to-right.
fn sort_by_reading_order(lines: &mut [Line]) {
    lines.sort_by(|a, b| {
        let row_a = (a.y / 20.0) as i64;
        let row_b = (b.y / 20.0) as i64;
        row_a
            .cmp(&row_b)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });
}
