//! Storage notification events.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Resource state reported for deleted objects.
pub const DELETED_STATE: &str = "not_exists";

/// A storage notification for an uploaded (or deleted) object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// Bucket holding the object.
    #[serde(default)]
    pub bucket: Option<String>,

    /// Object name within the bucket.
    #[serde(default)]
    pub name: Option<String>,

    /// `"not_exists"` for deletions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_state: Option<String>,
}

/// Background-function envelope, `{ "data": { ... } }`.
#[derive(Deserialize)]
struct Envelope {
    data: StorageEvent,
}

impl StorageEvent {
    /// Create an upload event for `bucket`/`name`.
    pub fn upload(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            name: Some(name.into()),
            resource_state: None,
        }
    }

    /// Parse an event from JSON, accepting either the bare object or one
    /// wrapped in a `data` envelope.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;

        let wrapped = value.get("data").is_some_and(serde_json::Value::is_object);
        let parsed = if wrapped {
            serde_json::from_value::<Envelope>(value).map(|envelope| envelope.data)
        } else {
            serde_json::from_value::<StorageEvent>(value)
        };

        parsed.map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Whether this notification reports a deletion.
    pub fn is_deletion(&self) -> bool {
        self.resource_state.as_deref() == Some(DELETED_STATE)
    }

    /// Resolve the object location. Empty strings count as missing.
    pub fn location(&self) -> Result<ObjectLocation, ValidationError> {
        let bucket = non_empty(&self.bucket).ok_or(ValidationError::MissingBucket)?;
        let name = non_empty(&self.name).ok_or(ValidationError::MissingFilename)?;

        Ok(ObjectLocation {
            bucket: bucket.to_string(),
            name: name.to_string(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A validated bucket/object pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub name: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    /// `gs://bucket/name` image URI.
    pub fn uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.name)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bare_event() {
        let event = StorageEvent::from_json(r#"{"bucket": "labels", "name": "a.jpg"}"#).unwrap();
        assert_eq!(event, StorageEvent::upload("labels", "a.jpg"));
    }

    #[test]
    fn test_parse_enveloped_event() {
        let json = r#"{"data": {"bucket": "labels", "name": "a.jpg", "resourceState": "not_exists"}}"#;
        let event = StorageEvent::from_json(json).unwrap();
        assert!(event.is_deletion());
        assert_eq!(event.name.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn test_parse_malformed_event() {
        let err = StorageEvent::from_json("not json").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn test_location_checks_bucket_first() {
        let event = StorageEvent::default();
        assert_eq!(event.location(), Err(ValidationError::MissingBucket));

        let event = StorageEvent {
            bucket: Some("labels".to_string()),
            name: Some(String::new()),
            resource_state: Some("exists".to_string()),
        };
        assert_eq!(event.location(), Err(ValidationError::MissingFilename));
        assert!(!event.is_deletion());
    }

    #[test]
    fn test_location_uri() {
        let location = StorageEvent::upload("labels", "plates/a.jpg").location().unwrap();
        assert_eq!(location.uri(), "gs://labels/plates/a.jpg");
        assert_eq!(location.to_string(), "gs://labels/plates/a.jpg");
    }
}
