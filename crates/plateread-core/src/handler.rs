//! Upload event handler: OCR the image, extract label fields, store the result.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::label::LabelParser;
use crate::models::config::PlatereadConfig;
use crate::models::event::StorageEvent;
use crate::models::fields::{ExtractedFields, LabelRecord};
use crate::ocr::OcrService;
use crate::store::RecordStore;

/// Default key path overwritten with each result.
pub const DEFAULT_RECORD_PATH: &str = "images/mostRecent";

/// What happened to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Deletion notification; nothing was done.
    Ignored,
    /// Fields were extracted and written to the store.
    Processed(ExtractedFields),
}

/// Handles storage notifications with injected OCR and store services.
///
/// Built once at startup and reused for every event. Invocations share no
/// state beyond the services themselves.
pub struct ImageHandler {
    ocr: Arc<dyn OcrService>,
    store: Arc<dyn RecordStore>,
    parser: LabelParser,
    record_path: String,
}

impl ImageHandler {
    pub fn new(ocr: Arc<dyn OcrService>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            ocr,
            store,
            parser: LabelParser::new(),
            record_path: DEFAULT_RECORD_PATH.to_string(),
        }
    }

    /// Create a handler using the store and extraction sections of the configuration.
    pub fn from_config(
        config: &PlatereadConfig,
        ocr: Arc<dyn OcrService>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self::new(ocr, store)
            .with_parser(LabelParser::from_config(&config.extraction))
            .with_record_path(config.store.record_path.clone())
    }

    pub fn with_parser(mut self, parser: LabelParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_record_path(mut self, record_path: impl Into<String>) -> Self {
        self.record_path = record_path.into();
        self
    }

    /// Process one storage notification.
    ///
    /// Deletions are ignored. Otherwise the event is validated, the OCR call
    /// completes, and only then is the record written. Any failure ends the
    /// invocation with an error; nothing is retried.
    pub async fn process_image(&self, event: &StorageEvent) -> Result<Outcome> {
        if event.is_deletion() {
            debug!("Ignoring deletion event for {:?}", event.name);
            return Ok(Outcome::Ignored);
        }

        let location = event.location()?;

        info!("Looking for text in image {}", location.name);
        let annotation = self.ocr.detect_text(&location).await?;
        let raw = annotation.map(|a| a.description).unwrap_or_default();
        info!("Extracted text from image ({})", raw);

        let fields = self.parser.parse(&raw);
        let record = serde_json::to_value(LabelRecord::from(fields.clone()))
            .map_err(StoreError::from)?;
        self.store.set(&self.record_path, record).await?;

        info!("File {} processed.", location.name);
        Ok(Outcome::Processed(fields))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::error::{OcrError, PlatereadError, ValidationError};
    use crate::label::BrandBoundary;
    use crate::models::event::ObjectLocation;
    use crate::ocr::TextAnnotation;
    use crate::store::MemoryStore;

    /// Returns canned text and counts calls.
    struct FakeOcr {
        text: Option<&'static str>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeOcr {
        fn returning(text: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                text,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                text: None,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OcrService for FakeOcr {
        async fn detect_text(
            &self,
            location: &ObjectLocation,
        ) -> std::result::Result<Option<TextAnnotation>, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(OcrError::Detection(format!("quota exceeded for {}", location)));
            }
            Ok(self.text.map(TextAnnotation::new))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn set(&self, path: &str, _value: Value) -> std::result::Result<(), StoreError> {
            Err(StoreError::Write {
                path: path.to_string(),
                reason: "permission denied".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_upload_is_processed_and_stored() {
        let ocr = FakeOcr::returning(Some("BREAKER SQUARE DTM\nCAT NO QO120 X\nPO# 4567 rest"));
        let store = Arc::new(MemoryStore::new());
        let handler = ImageHandler::new(ocr.clone(), store.clone());

        let outcome = handler
            .process_image(&StorageEvent::upload("labels", "a.jpg"))
            .await
            .unwrap();

        let Outcome::Processed(fields) = outcome else {
            panic!("expected processed outcome");
        };
        assert_eq!(fields.brand, "SQUARE D");
        assert_eq!(fields.catalogue, "QO120");
        assert_eq!(fields.order_num, "4567");
        assert_eq!(ocr.calls(), 1);
        assert_eq!(
            store.get("images/mostRecent"),
            Some(json!({
                "text": {
                    "raw": "BREAKER SQUARE DTM\nCAT NO QO120 X\nPO# 4567 rest",
                    "brand": "SQUARE D",
                    "catalogue": "QO120",
                    "orderNum": "4567"
                }
            }))
        );
    }

    #[tokio::test]
    async fn test_no_annotation_still_writes_defaults() {
        let ocr = FakeOcr::returning(None);
        let store = Arc::new(MemoryStore::new());
        let handler = ImageHandler::new(ocr, store.clone());

        handler
            .process_image(&StorageEvent::upload("labels", "blank.jpg"))
            .await
            .unwrap();

        assert_eq!(
            store.get("images/mostRecent/text"),
            Some(json!({
                "raw": "",
                "brand": "EATON",
                "catalogue": "",
                "orderNum": "No ORDER found"
            }))
        );
    }

    #[tokio::test]
    async fn test_deletion_is_ignored() {
        let ocr = FakeOcr::returning(Some("PO# 1"));
        let store = Arc::new(MemoryStore::new());
        let handler = ImageHandler::new(ocr.clone(), store.clone());

        let event = StorageEvent {
            bucket: Some("labels".to_string()),
            name: Some("a.jpg".to_string()),
            resource_state: Some("not_exists".to_string()),
        };
        let outcome = handler.process_image(&event).await.unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(ocr.calls(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_deletion_without_bucket_is_still_ignored() {
        let ocr = FakeOcr::returning(None);
        let handler = ImageHandler::new(ocr, Arc::new(MemoryStore::new()));

        let event = StorageEvent {
            resource_state: Some("not_exists".to_string()),
            ..StorageEvent::default()
        };

        assert_eq!(handler.process_image(&event).await.unwrap(), Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_missing_name_fails_before_ocr() {
        let ocr = FakeOcr::returning(Some("PO# 1"));
        let store = Arc::new(MemoryStore::new());
        let handler = ImageHandler::new(ocr.clone(), store.clone());

        let event = StorageEvent {
            bucket: Some("labels".to_string()),
            ..StorageEvent::default()
        };
        let err = handler.process_image(&event).await.unwrap_err();

        assert!(matches!(
            err,
            PlatereadError::Validation(ValidationError::MissingFilename)
        ));
        assert_eq!(ocr.calls(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_bucket_fails() {
        let handler = ImageHandler::new(FakeOcr::returning(None), Arc::new(MemoryStore::new()));

        let event = StorageEvent {
            name: Some("a.jpg".to_string()),
            ..StorageEvent::default()
        };
        let err = handler.process_image(&event).await.unwrap_err();

        assert!(matches!(
            err,
            PlatereadError::Validation(ValidationError::MissingBucket)
        ));
    }

    #[tokio::test]
    async fn test_ocr_failure_skips_write() {
        let store = Arc::new(MemoryStore::new());
        let handler = ImageHandler::new(FakeOcr::failing(), store.clone());

        let err = handler
            .process_image(&StorageEvent::upload("labels", "a.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, PlatereadError::Ocr(OcrError::Detection(_))));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let handler = ImageHandler::new(FakeOcr::returning(Some("x")), Arc::new(FailingStore));

        let err = handler
            .process_image(&StorageEvent::upload("labels", "a.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, PlatereadError::Store(StoreError::Write { .. })));
    }

    #[tokio::test]
    async fn test_from_config() {
        let mut config = PlatereadConfig::default();
        config.store.record_path = "plates/latest".to_string();
        config.extraction.brand_boundary = BrandBoundary::Nearest;

        let store = Arc::new(MemoryStore::new());
        let handler = ImageHandler::from_config(
            &config,
            FakeOcr::returning(Some("made by ACMETM")),
            store.clone(),
        );

        handler
            .process_image(&StorageEvent::upload("labels", "a.jpg"))
            .await
            .unwrap();

        assert_eq!(store.get("plates/latest/text/brand"), Some(json!("ACME")));
        assert_eq!(store.get("images/mostRecent"), None);
    }
}
