//! The undoable canvas content.

use crate::shapes::ShapeRegistry;
use crate::strokes::StrokeSet;
use serde::{Deserialize, Serialize};

/// Everything undo/redo restores: hand-drawn strokes and placed shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    pub strokes: StrokeSet,
    pub shapes: ShapeRegistry,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.shapes.is_empty()
    }
}
