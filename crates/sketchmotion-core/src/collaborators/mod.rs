//! Boundaries to collaborators outside the core: image loading and publishing.

mod image;
mod publish;

pub use image::{DataUrlLoader, ImageFormat, ImageHandle, ImageLoader, UploadError, UploadResult};
pub use publish::{
    ExportPayload, MemoryPublisher, NoopPublisher, PublishError, PublishResult, PublishTarget,
    Publisher,
};

use std::future::Future;
use std::pin::Pin;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
