//! Save-to-account and share-with-community boundaries.

use super::{BoxFuture, ImageHandle};
use crate::animation::MotionProfile;
use crate::editor::Step;
use crate::shapes::Shape;
use crate::strokes::StrokeSet;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

/// Publish errors.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Publishing is only available in the share step (current: {0:?})")]
    WrongStep(Step),
    #[error("Publish error: {0}")]
    Other(String),
}

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Where a payload is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishTarget {
    Account,
    Community,
}

/// Logical snapshot of the editor handed to save/share collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub id: Uuid,
    pub strokes: StrokeSet,
    pub shapes: Vec<Shape>,
    pub image: Option<ImageHandle>,
    pub profile: MotionProfile,
    pub speed: f64,
}

impl ExportPayload {
    /// Serialize the payload to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a payload from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Receives export payloads.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Publisher: Send + Sync {
    fn publish(
        &self,
        target: PublishTarget,
        payload: &ExportPayload,
    ) -> BoxFuture<'_, PublishResult<()>>;
}

/// Receives export payloads (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Publisher {
    fn publish(
        &self,
        target: PublishTarget,
        payload: &ExportPayload,
    ) -> BoxFuture<'_, PublishResult<()>>;
}

/// Accepts and discards every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    fn publish(
        &self,
        target: PublishTarget,
        payload: &ExportPayload,
    ) -> BoxFuture<'_, PublishResult<()>> {
        log::debug!("Discarding {:?} payload {}", target, payload.id);
        Box::pin(async { Ok(()) })
    }
}

/// In-memory publisher for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryPublisher {
    published: RwLock<Vec<(PublishTarget, ExportPayload)>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, oldest first.
    pub fn published(&self) -> PublishResult<Vec<(PublishTarget, ExportPayload)>> {
        let published = self
            .published
            .read()
            .map_err(|e| PublishError::Other(format!("Lock error: {}", e)))?;
        Ok(published.clone())
    }
}

impl Publisher for MemoryPublisher {
    fn publish(
        &self,
        target: PublishTarget,
        payload: &ExportPayload,
    ) -> BoxFuture<'_, PublishResult<()>> {
        let payload = payload.clone();
        Box::pin(async move {
            let mut published = self
                .published
                .write()
                .map_err(|e| PublishError::Other(format!("Lock error: {}", e)))?;
            published.push((target, payload));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ExportPayload {
        ExportPayload {
            id: Uuid::new_v4(),
            strokes: StrokeSet::new(),
            shapes: Vec::new(),
            image: None,
            profile: MotionProfile::Walk,
            speed: 2.0,
        }
    }

    #[test]
    fn test_memory_publisher_records() {
        let publisher = MemoryPublisher::new();
        let payload = payload();

        pollster::block_on(publisher.publish(PublishTarget::Account, &payload)).unwrap();
        pollster::block_on(publisher.publish(PublishTarget::Community, &payload)).unwrap();

        let published = publisher.published().unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].0, PublishTarget::Account);
        assert_eq!(published[1].1, payload);
    }

    #[test]
    fn test_noop_publisher() {
        let result = pollster::block_on(NoopPublisher.publish(PublishTarget::Account, &payload()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_payload_json_roundtrip() {
        let payload = payload();
        let json = payload.to_json().unwrap();
        assert!(json.contains("\"profile\": \"walk\""));
        assert_eq!(ExportPayload::from_json(&json).unwrap(), payload);
    }
}
