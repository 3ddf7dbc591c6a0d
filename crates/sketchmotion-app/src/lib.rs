//! SketchMotion headless shell.
//!
//! Drives the editor core the way an interactive front end would: a short
//! scripted drawing, a few animated shapes on a frame loop, then save and
//! share. The resulting export payload is printed as JSON.

use clap::Parser;
use kurbo::Point;
use sketchmotion_core::collaborators::{PublishError, UploadError};
use sketchmotion_core::{
    ConfigError, DataUrlLoader, Editor, EditorConfig, EditorIntent, FrameClock, FrameControl,
    NoopPublisher, PointerEvent, PointerSource, ShapeKind,
};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Display refresh interval used by the headless frame loop.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),
    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Command-line options.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "sketchmotion", about = "Draw, animate and export a SketchMotion sketch")]
pub struct Options {
    /// Editor config (JSON); defaults apply to anything it leaves out
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Background image to upload before drawing
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Motion profile: bounce, breathe, walk, scatter or rotate
    #[arg(long, default_value = "bounce")]
    pub profile: String,

    /// Speed multiplier (clamped to 0.1-5)
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Number of animation frames to run
    #[arg(long, default_value_t = 120)]
    pub frames: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self::parse_from(["sketchmotion"])
    }
}

/// Headless application.
pub struct App {
    editor: Editor,
    options: Options,
}

impl App {
    pub fn new(options: Options) -> Result<Self, AppError> {
        let config = match &options.config {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                EditorConfig::load(path)?
            }
            None => EditorConfig::default(),
        };
        Ok(Self {
            editor: Editor::new(config),
            options,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Run the whole workflow and return the exported payload as JSON.
    pub async fn run(&mut self) -> Result<String, AppError> {
        self.draw().await?;

        self.editor.next_step();
        self.place_shapes();
        let frames = self.drive_frames(FRAME_INTERVAL);
        log::info!("Animated {} frames", frames);

        self.editor.next_step();
        self.editor.save_to_account(&NoopPublisher).await?;
        self.editor.share_with_community(&NoopPublisher).await?;

        Ok(self.editor.export_payload().to_json()?)
    }

    async fn draw(&mut self) -> Result<(), AppError> {
        if let Some(path) = &self.options.image {
            let bytes = std::fs::read(path)?;
            self.editor.upload_image(&DataUrlLoader, Some(bytes.as_slice())).await?;
        }

        self.editor.dispatch(EditorIntent::SetStrokeWidth(4));
        self.editor.dispatch(EditorIntent::SetStrokeColor("#1e1e1e".to_string()));
        let spiral = spiral(Point::new(250.0, 200.0), 48);
        if let Some((first, rest)) = spiral.split_first() {
            self.editor.pointer(PointerEvent::Down(PointerSource::mouse(first.x, first.y)));
            for point in rest {
                self.editor.pointer(PointerEvent::Move(PointerSource::mouse(point.x, point.y)));
            }
            self.editor.pointer(PointerEvent::Up);
        }
        Ok(())
    }

    fn place_shapes(&mut self) {
        self.editor.set_animation_type(&self.options.profile);
        self.editor.set_speed(self.options.speed);
        let colors = ["#e03131", "#2f9e44", "#1971c2", "#f08c00"];
        for (kind, color) in ShapeKind::ALL.iter().zip(colors) {
            self.editor.set_shape_kind(*kind);
            self.editor.set_stroke_color(color);
            self.editor.add_shape();
        }
    }

    /// Deliver frames until the configured count is reached or the editor
    /// asks to stop. Returns the number of frames delivered.
    pub fn drive_frames(&mut self, interval: Duration) -> u32 {
        let Some(handle) = self.editor.start_animation() else {
            return 0;
        };
        let clock = FrameClock::new();
        let mut delivered = 0;
        while delivered < self.options.frames {
            if self.editor.on_frame(handle, clock.now_ms()) == FrameControl::Stop {
                break;
            }
            delivered += 1;
            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        delivered
    }
}

fn spiral(center: Point, steps: usize) -> Vec<Point> {
    (0..steps)
        .map(|i| {
            let t = i as f64 * 0.35;
            let r = 4.0 + t * 8.0;
            Point::new(center.x + r * t.cos(), center.y + r * t.sin())
        })
        .collect()
}
