//! SketchMotion Core Library
//!
//! Platform-agnostic core for the SketchMotion editor: freehand strokes,
//! undo/redo history, animated shapes and the step-based workflow that ties
//! them together.

pub mod animation;
pub mod collaborators;
pub mod config;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod input;
pub mod shapes;
pub mod sketch;
pub mod strokes;

pub use animation::{
    AnimationSession, FrameClock, FrameControl, FrameHandle, MotionProfile, MotionSettings,
    RunState,
};
pub use collaborators::{
    DataUrlLoader, ExportPayload, ImageHandle, ImageLoader, NoopPublisher, Publisher,
};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, EditorEvent, EditorIntent, EditorState, RenderFrame, Step};
pub use geometry::HexColor;
pub use history::{History, HistoryConfig};
pub use input::{PointerEvent, PointerSource, Shortcut};
pub use shapes::{PlacementBounds, Shape, ShapeKind, ShapeRegistry};
pub use sketch::Sketch;
pub use strokes::{Stroke, StrokeCapture, StrokeSet};
