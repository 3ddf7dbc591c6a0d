//! Editor controller: the step-based draw → animate → share workflow.
//!
//! [`Editor`] is the only surface the presentation layer talks to. It routes
//! pointer and keyboard input to stroke capture or shape dragging depending on
//! the current step, keeps the undo history, drives the animation session
//! from host frame callbacks and hands export payloads to collaborators.

use crate::animation::{
    AnimationSession, FrameControl, FrameHandle, FrameLoop, MotionProfile, RunState,
};
use crate::collaborators::{
    ExportPayload, ImageHandle, ImageLoader, PublishError, PublishResult, PublishTarget, Publisher,
    UploadError, UploadResult,
};
use crate::config::EditorConfig;
use crate::geometry::HexColor;
use crate::history::History;
use crate::input::{PointerEvent, PointerSource, Shortcut};
use crate::shapes::{Shape, ShapeKind, ShapeRegistry};
use crate::sketch::Sketch;
use crate::strokes::{StrokeCapture, StrokeSet, clamp_stroke_width};
use kurbo::{Point, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Draw or upload artwork.
    #[default]
    Draw,
    /// Place shapes and animate them.
    Animate,
    /// Save or share the result.
    Share,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Step::Draw => 1,
            Step::Animate => 2,
            Step::Share => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Step::Draw => Some(Step::Animate),
            Step::Animate => Some(Step::Share),
            Step::Share => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Step::Draw => None,
            Step::Animate => Some(Step::Draw),
            Step::Share => Some(Step::Animate),
        }
    }
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    StepChanged { from: Step, to: Step },
    OverlayHidden,
    ImageChanged,
    AnimationStateChanged { state: RunState },
}

/// Workflow state that is not part of the undoable sketch.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    step: Step,
    image: Option<ImageHandle>,
    overlay_hidden: bool,
}

impl EditorState {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    /// The "draw or upload" overlay shows until the first stroke or upload.
    pub fn overlay_visible(&self) -> bool {
        !self.overlay_hidden
    }
}

/// Every control and input event the editor understands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "intent", content = "args", rename_all = "snake_case")]
pub enum EditorIntent {
    Pointer(PointerEvent),
    Key { key: String, ctrl: bool, shift: bool },
    SetStrokeWidth(i64),
    SetStrokeColor(String),
    SetShapeKind(ShapeKind),
    SetAnimationType(String),
    SetSpeed(f64),
    Undo,
    Redo,
    Clear,
    AddShape,
    SelectShape(usize),
    TogglePause,
    NextStep,
    PreviousStep,
}

/// What a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub step: Step,
    pub strokes: &'a StrokeSet,
    pub shapes: &'a [Shape],
    /// Visual scale for every shape (breathe); sizes are unscaled.
    pub shape_scale: f64,
    pub selected: Option<usize>,
    pub image: Option<&'a ImageHandle>,
    pub overlay_visible: bool,
}

/// An in-progress shape drag.
#[derive(Debug, Clone)]
struct Drag {
    index: usize,
    grab_offset: Vec2,
    baseline: Sketch,
    moved: bool,
}

/// The sketch-to-animation editor.
pub struct Editor<R: Rng = StdRng> {
    config: EditorConfig,
    history: History<Sketch>,
    capture: StrokeCapture,
    drag: Option<Drag>,
    session: AnimationSession,
    frames: FrameLoop,
    state: EditorState,
    stroke_width: u8,
    stroke_color: HexColor,
    shape_kind: ShapeKind,
    rng: R,
    events: Vec<EditorEvent>,
}

impl Editor<StdRng> {
    /// Create an editor with an entropy-seeded random source.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl Default for Editor<StdRng> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<R: Rng> Editor<R> {
    /// Create an editor with a caller-supplied random source.
    pub fn with_rng(config: EditorConfig, rng: R) -> Self {
        Self {
            history: History::new(Sketch::new(), config.history),
            capture: StrokeCapture::new(),
            drag: None,
            session: AnimationSession::new(config.motion),
            frames: FrameLoop::new(),
            state: EditorState::default(),
            stroke_width: clamp_stroke_width(i64::from(config.default_stroke_width)),
            stroke_color: config.default_stroke_color,
            shape_kind: config.default_shape,
            rng,
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn sketch(&self) -> &Sketch {
        self.history.current()
    }

    pub fn strokes(&self) -> &StrokeSet {
        &self.history.current().strokes
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.history.current().shapes
    }

    pub fn session(&self) -> &AnimationSession {
        &self.session
    }

    pub fn stroke_width(&self) -> u8 {
        self.stroke_width
    }

    pub fn stroke_color(&self) -> HexColor {
        self.stroke_color
    }

    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drain pending notifications.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    fn hide_overlay(&mut self) {
        if !self.state.overlay_hidden {
            self.state.overlay_hidden = true;
            self.emit(EditorEvent::OverlayHidden);
        }
    }

    // --- Steps ---

    /// Move to an adjacent step.
    pub fn go_to_step(&mut self, step: Step) -> bool {
        let from = self.state.step;
        if from.next() != Some(step) && from.previous() != Some(step) {
            log::debug!("Ignoring step change {:?} -> {:?}", from, step);
            return false;
        }

        match from {
            Step::Draw => {
                self.end_stroke();
            }
            Step::Animate => self.finish_drag(),
            Step::Share => {}
        }

        self.state.step = step;
        log::debug!("Step {} -> {}", from.number(), step.number());
        self.emit(EditorEvent::StepChanged { from, to: step });

        match step {
            Step::Animate if from == Step::Draw => {
                self.start_animation();
            }
            Step::Draw => self.stop_animation(),
            _ => {}
        }
        true
    }

    pub fn next_step(&mut self) -> bool {
        match self.state.step.next() {
            Some(step) => self.go_to_step(step),
            None => false,
        }
    }

    pub fn previous_step(&mut self) -> bool {
        match self.state.step.previous() {
            Some(step) => self.go_to_step(step),
            None => false,
        }
    }

    // --- Controls ---

    /// Set the width for new strokes, clamped to 1–10.
    pub fn set_stroke_width(&mut self, width: i64) {
        self.stroke_width = clamp_stroke_width(width);
    }

    /// Set the color for new strokes and shapes. Invalid hex strings are ignored.
    pub fn set_stroke_color(&mut self, color: &str) -> bool {
        match HexColor::parse(color) {
            Some(color) => {
                self.stroke_color = color;
                true
            }
            None => {
                log::warn!("Ignoring invalid color {:?}", color);
                false
            }
        }
    }

    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.shape_kind = kind;
    }

    /// Select the motion profile by name. Unknown names select a no-op profile.
    pub fn set_animation_type(&mut self, name: &str) {
        self.set_motion_profile(MotionProfile::from_name(name));
    }

    pub fn set_motion_profile(&mut self, profile: MotionProfile) {
        self.session.set_profile(profile);
    }

    /// Set the speed multiplier, clamped to 0.1–5.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        self.session.set_speed(speed)
    }

    // --- Stroke capture ---

    /// Start a stroke with the current width and color (draw step only).
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if self.state.step != Step::Draw {
            return false;
        }
        let started = self.capture.begin(
            &mut self.history,
            point,
            self.stroke_width,
            self.stroke_color,
        );
        if started {
            self.hide_overlay();
        }
        started
    }

    pub fn extend_stroke(&mut self, point: Point) -> bool {
        if self.state.step != Step::Draw {
            return false;
        }
        self.capture.extend(&mut self.history, point)
    }

    pub fn end_stroke(&mut self) -> bool {
        self.capture.end(&mut self.history)
    }

    // --- Shapes ---

    /// Place a shape of the current kind and color (animate step only).
    pub fn add_shape(&mut self) -> Option<usize> {
        if self.state.step != Step::Animate {
            return None;
        }
        let before = self.history.current().clone();
        let index = self.history.current_mut().shapes.add_shape(
            self.shape_kind,
            self.stroke_color,
            &self.config.placement,
            &mut self.rng,
        );
        self.history.commit(before);
        Some(index)
    }

    pub fn select_shape(&mut self, index: usize) -> bool {
        if self.state.step != Step::Animate {
            return false;
        }
        self.history.current_mut().shapes.select_shape(index)
    }

    pub fn deselect_shape(&mut self) {
        self.history.current_mut().shapes.deselect();
    }

    /// Move a shape to a new position (animate step only).
    pub fn move_shape(&mut self, index: usize, x: f64, y: f64) -> bool {
        if self.state.step != Step::Animate || index >= self.shapes().len() {
            return false;
        }
        let before = self.history.current().clone();
        self.history.current_mut().shapes.move_shape(index, x, y);
        self.history.commit(before);
        true
    }

    fn begin_drag(&mut self, point: Point) -> bool {
        self.finish_drag();
        let scale = self.session.scale();
        let shapes = &mut self.history.current_mut().shapes;
        let Some(index) = shapes.shape_at(point, scale) else {
            shapes.deselect();
            return false;
        };
        shapes.select_shape(index);
        let grab_offset = shapes
            .get(index)
            .map(|shape| shape.position - point)
            .unwrap_or(Vec2::ZERO);
        self.drag = Some(Drag {
            index,
            grab_offset,
            baseline: self.history.current().clone(),
            moved: false,
        });
        true
    }

    fn update_drag(&mut self, point: Point) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let target = point + drag.grab_offset;
        let target = Point::new(
            target.x.clamp(0.0, self.config.canvas_width.max(0.0)),
            target.y.clamp(0.0, self.config.canvas_height.max(0.0)),
        );
        drag.moved |= self
            .history
            .current_mut()
            .shapes
            .move_shape(drag.index, target.x, target.y);
        drag.moved
    }

    fn finish_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            if drag.moved {
                self.history.commit(drag.baseline);
            }
        }
    }

    // --- Pointer & keyboard ---

    /// Route a pointer event according to the current step.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        match (self.state.step, event) {
            (Step::Draw, PointerEvent::Down(source)) => {
                resolve(&source).is_some_and(|p| self.begin_stroke(p))
            }
            (Step::Draw, PointerEvent::Move(source)) => {
                resolve(&source).is_some_and(|p| self.extend_stroke(p))
            }
            (Step::Draw, PointerEvent::Up) => self.end_stroke(),
            (Step::Animate, PointerEvent::Down(source)) => {
                resolve(&source).is_some_and(|p| self.begin_drag(p))
            }
            (Step::Animate, PointerEvent::Move(source)) => {
                resolve(&source).is_some_and(|p| self.update_drag(p))
            }
            (Step::Animate, PointerEvent::Up) => {
                let dragging = self.drag.is_some();
                self.finish_drag();
                dragging
            }
            (Step::Share, _) => false,
        }
    }

    /// Handle a key press. Returns true if it mapped to a shortcut.
    pub fn key(&mut self, key: &str, ctrl: bool, shift: bool) -> bool {
        let Some(shortcut) = Shortcut::from_key(key, ctrl, shift) else {
            return false;
        };
        match shortcut {
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::TogglePause => self.toggle_pause().is_some(),
            Shortcut::Clear => self.clear(),
            Shortcut::Deselect => {
                self.deselect_shape();
                true
            }
        }
    }

    /// Apply an intent. Returns true if it changed anything.
    pub fn dispatch(&mut self, intent: EditorIntent) -> bool {
        match intent {
            EditorIntent::Pointer(event) => self.pointer(event),
            EditorIntent::Key { key, ctrl, shift } => self.key(&key, ctrl, shift),
            EditorIntent::SetStrokeWidth(width) => {
                self.set_stroke_width(width);
                true
            }
            EditorIntent::SetStrokeColor(color) => self.set_stroke_color(&color),
            EditorIntent::SetShapeKind(kind) => {
                self.set_shape_kind(kind);
                true
            }
            EditorIntent::SetAnimationType(name) => {
                self.set_animation_type(&name);
                true
            }
            EditorIntent::SetSpeed(speed) => self.set_speed(speed),
            EditorIntent::Undo => self.undo(),
            EditorIntent::Redo => self.redo(),
            EditorIntent::Clear => self.clear(),
            EditorIntent::AddShape => self.add_shape().is_some(),
            EditorIntent::SelectShape(index) => self.select_shape(index),
            EditorIntent::TogglePause => self.toggle_pause().is_some(),
            EditorIntent::NextStep => self.next_step(),
            EditorIntent::PreviousStep => self.previous_step(),
        }
    }

    // --- History ---

    fn editing_allowed(&self) -> bool {
        matches!(self.state.step, Step::Draw | Step::Animate)
    }

    /// Settle in-progress gestures so history sees a consistent sketch.
    fn settle_gestures(&mut self) {
        self.capture.end(&mut self.history);
        self.finish_drag();
    }

    pub fn undo(&mut self) -> bool {
        if !self.editing_allowed() {
            return false;
        }
        self.settle_gestures();
        if !self.history.undo() {
            return false;
        }
        self.after_history_jump();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.editing_allowed() {
            return false;
        }
        self.settle_gestures();
        if !self.history.redo() {
            return false;
        }
        self.after_history_jump();
        true
    }

    fn after_history_jump(&mut self) {
        self.history.current_mut().shapes.deselect();
        self.reset_animation();
    }

    /// Empty the canvas, the history and the shapes, and stop the animation.
    pub fn clear(&mut self) -> bool {
        if !self.editing_allowed() {
            return false;
        }
        self.capture = StrokeCapture::new();
        self.drag = None;
        self.history.clear();
        self.reset_animation();
        log::debug!("Canvas cleared");
        true
    }

    // --- Animation ---

    /// Start (or resume) the animation and return the handle for frame callbacks.
    pub fn start_animation(&mut self) -> Option<FrameHandle> {
        if self.state.step == Step::Draw {
            return None;
        }
        if !self.session.is_running() {
            self.session.start();
            self.emit(EditorEvent::AnimationStateChanged {
                state: RunState::Running,
            });
        }
        Some(self.frames.start())
    }

    /// Stop the animation loop. Safe to call repeatedly.
    pub fn stop_animation(&mut self) {
        let was_active = self.frames.stop();
        if self.session.state() != RunState::Stopped {
            self.session.stop();
        }
        if was_active {
            self.emit(EditorEvent::AnimationStateChanged {
                state: RunState::Stopped,
            });
        }
    }

    fn reset_animation(&mut self) {
        self.stop_animation();
        self.session.reset();
    }

    /// Pause a running animation, or run a paused or stopped one.
    /// Returns the new state, or `None` in the draw step.
    pub fn toggle_pause(&mut self) -> Option<RunState> {
        if self.state.step == Step::Draw {
            return None;
        }
        if self.session.state() == RunState::Stopped {
            self.start_animation();
        } else {
            let state = self.session.toggle_pause();
            self.emit(EditorEvent::AnimationStateChanged { state });
        }
        Some(self.session.state())
    }

    /// Handle for the running frame loop, if any.
    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.frames.handle()
    }

    /// Deliver one display refresh. `now_ms` comes from a monotonic clock.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> FrameControl {
        if !self.frames.accepts(handle) {
            return FrameControl::Stop;
        }
        self.session.tick(
            now_ms,
            self.history.current_mut().shapes.shapes_mut(),
            &mut self.rng,
        );
        FrameControl::Continue
    }

    // --- Upload ---

    /// Load a selected file as the background image.
    ///
    /// On failure the current image and the overlay are left as they were.
    pub async fn upload_image<L>(&mut self, loader: &L, file: Option<&[u8]>) -> UploadResult<()>
    where
        L: ImageLoader + ?Sized,
    {
        let Some(data) = file else {
            log::warn!("Upload requested without a file");
            return Err(UploadError::NoFile);
        };
        match loader.load(data).await {
            Ok(handle) => {
                log::info!("Uploaded {:?} image ({} bytes)", handle.format, handle.byte_len);
                self.state.image = Some(handle);
                self.emit(EditorEvent::ImageChanged);
                self.hide_overlay();
                Ok(())
            }
            Err(e) => {
                log::warn!("Image upload failed: {}", e);
                Err(e)
            }
        }
    }

    // --- Export ---

    /// Snapshot of the editor for save/share.
    pub fn export_payload(&self) -> ExportPayload {
        let sketch = self.history.current();
        ExportPayload {
            id: Uuid::new_v4(),
            strokes: sketch.strokes.clone(),
            shapes: sketch.shapes.shapes().to_vec(),
            image: self.state.image.clone(),
            profile: self.session.profile(),
            speed: self.session.speed(),
        }
    }

    async fn publish<P>(&self, publisher: &P, target: PublishTarget) -> PublishResult<()>
    where
        P: Publisher + ?Sized,
    {
        if self.state.step != Step::Share {
            return Err(PublishError::WrongStep(self.state.step));
        }
        let payload = self.export_payload();
        publisher.publish(target, &payload).await?;
        log::info!("Published payload {} to {:?}", payload.id, target);
        Ok(())
    }

    pub async fn save_to_account<P>(&self, publisher: &P) -> PublishResult<()>
    where
        P: Publisher + ?Sized,
    {
        self.publish(publisher, PublishTarget::Account).await
    }

    pub async fn share_with_community<P>(&self, publisher: &P) -> PublishResult<()>
    where
        P: Publisher + ?Sized,
    {
        self.publish(publisher, PublishTarget::Community).await
    }

    // --- Output ---

    pub fn render(&self) -> RenderFrame<'_> {
        let sketch = self.history.current();
        RenderFrame {
            step: self.state.step,
            strokes: &sketch.strokes,
            shapes: sketch.shapes.shapes(),
            shape_scale: self.session.scale(),
            selected: sketch.shapes.selected(),
            image: self.state.image.as_ref(),
            overlay_visible: self.state.overlay_visible(),
        }
    }
}

impl<R: Rng> Drop for Editor<R> {
    fn drop(&mut self) {
        self.frames.stop();
    }
}

fn resolve(source: &PointerSource) -> Option<Point> {
    let point = source.position();
    if point.is_none() {
        log::debug!("Dropping pointer event without a position");
    }
    point
}
