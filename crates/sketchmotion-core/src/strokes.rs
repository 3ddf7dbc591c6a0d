//! Freehand strokes and pointer-driven stroke capture.

use crate::geometry::HexColor;
use crate::history::History;
use crate::sketch::Sketch;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Thinnest allowed stroke width.
pub const MIN_STROKE_WIDTH: u8 = 1;
/// Thickest allowed stroke width.
pub const MAX_STROKE_WIDTH: u8 = 10;

/// Clamp a requested width into the supported range.
pub fn clamp_stroke_width(width: i64) -> u8 {
    width.clamp(MIN_STROKE_WIDTH as i64, MAX_STROKE_WIDTH as i64) as u8
}

/// One continuous freehand line.
///
/// Width and color are fixed when the stroke begins. Points can only be
/// appended while the stroke is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<Point>,
    width: u8,
    color: HexColor,
    #[serde(default)]
    open: bool,
}

impl Stroke {
    /// Start an open stroke at `start`.
    pub fn begin(start: Point, width: u8, color: HexColor) -> Self {
        Self {
            points: vec![start],
            width: width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            color,
            open: true,
        }
    }

    /// Build a closed stroke from existing points.
    pub fn from_points(points: Vec<Point>, width: u8, color: HexColor) -> Self {
        Self {
            points,
            width: width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            color,
            open: false,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn color(&self) -> HexColor {
        self.color
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point; ignored once the stroke is closed.
    fn push(&mut self, point: Point) -> bool {
        if !self.open {
            return false;
        }
        self.points.push(point);
        true
    }

    fn close(&mut self) {
        self.open = false;
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }
}

/// The drawing content of the canvas, in drawing order.
///
/// Only the last stroke may still be open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeSet {
    strokes: Vec<Stroke>,
}

impl StrokeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    /// Whether the last stroke is still accepting points.
    pub fn has_open_stroke(&self) -> bool {
        self.strokes.last().is_some_and(Stroke::is_open)
    }

    fn open_stroke_mut(&mut self) -> Option<&mut Stroke> {
        self.strokes.last_mut().filter(|s| s.is_open())
    }

    /// Append a closed stroke. Any open stroke is closed first.
    pub fn push_closed(&mut self, mut stroke: Stroke) {
        if let Some(open) = self.open_stroke_mut() {
            open.close();
        }
        stroke.close();
        self.strokes.push(stroke);
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}

/// Turns pointer down/move/up into strokes and history commits.
///
/// The sketch as it was before the active stroke began is held as the
/// baseline, and committed to history once the stroke ends.
#[derive(Debug, Clone, Default)]
pub struct StrokeCapture {
    baseline: Option<Sketch>,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stroke is currently being drawn.
    pub fn is_active(&self) -> bool {
        self.baseline.is_some()
    }

    /// Open a new stroke. Does nothing if one is already open.
    pub fn begin(
        &mut self,
        history: &mut History<Sketch>,
        point: Point,
        width: u8,
        color: HexColor,
    ) -> bool {
        if history.current().strokes.has_open_stroke() {
            log::debug!("Ignoring stroke start: a stroke is already open");
            return false;
        }
        self.baseline = Some(history.current().clone());
        history
            .current_mut()
            .strokes
            .strokes
            .push(Stroke::begin(point, width, color));
        true
    }

    /// Append a point to the open stroke.
    ///
    /// Without an open stroke (a missed start event) this does nothing and
    /// leaves every closed stroke untouched.
    pub fn extend(&mut self, history: &mut History<Sketch>, point: Point) -> bool {
        match history.current_mut().strokes.open_stroke_mut() {
            Some(stroke) => stroke.push(point),
            None => {
                log::debug!("Dropping stroke move: no open stroke");
                false
            }
        }
    }

    /// Close the open stroke and commit it to history.
    ///
    /// A stroke that never moved past its first point is discarded.
    pub fn end(&mut self, history: &mut History<Sketch>) -> bool {
        let baseline = self.baseline.take();
        let strokes = &mut history.current_mut().strokes;
        let Some(stroke) = strokes.open_stroke_mut() else {
            return false;
        };

        if stroke.len() < 2 {
            strokes.strokes.pop();
            log::debug!("Discarding single-point stroke");
            return false;
        }
        stroke.close();

        if let Some(before) = baseline {
            history.commit(before);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> HexColor {
        HexColor::rgb(255, 0, 0)
    }

    #[test]
    fn test_clamp_stroke_width() {
        assert_eq!(clamp_stroke_width(0), 1);
        assert_eq!(clamp_stroke_width(-5), 1);
        assert_eq!(clamp_stroke_width(4), 4);
        assert_eq!(clamp_stroke_width(99), 10);
    }

    #[test]
    fn test_point_count_matches_events() {
        let mut history = History::<Sketch>::default();
        let mut capture = StrokeCapture::new();

        for extends in 1..6 {
            assert!(capture.begin(&mut history, Point::new(0.0, 0.0), 3, red()));
            for i in 0..extends {
                assert!(capture.extend(&mut history, Point::new(i as f64, 1.0)));
            }
            assert!(capture.end(&mut history));

            let stroke = history.current().strokes.last().unwrap();
            assert_eq!(stroke.len(), 1 + extends);
            assert!(!stroke.is_open());
        }
        assert_eq!(history.current().strokes.len(), 5);
    }

    #[test]
    fn test_begin_while_open_is_ignored() {
        let mut history = History::<Sketch>::default();
        let mut capture = StrokeCapture::new();

        assert!(capture.begin(&mut history, Point::new(0.0, 0.0), 3, red()));
        assert!(!capture.begin(&mut history, Point::new(5.0, 5.0), 8, HexColor::black()));

        let strokes = &history.current().strokes;
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes.last().unwrap().width(), 3);
    }

    #[test]
    fn test_extend_without_open_stroke_is_noop() {
        let mut history = History::<Sketch>::default();
        let mut capture = StrokeCapture::new();

        // No strokes at all.
        assert!(!capture.extend(&mut history, Point::new(1.0, 1.0)));
        assert!(history.current().strokes.is_empty());

        // A finished stroke must not pick up stray moves.
        capture.begin(&mut history, Point::new(0.0, 0.0), 2, red());
        capture.extend(&mut history, Point::new(1.0, 0.0));
        capture.end(&mut history);
        let before = history.current().strokes.clone();

        assert!(!capture.extend(&mut history, Point::new(9.0, 9.0)));
        assert_eq!(history.current().strokes, before);
    }

    #[test]
    fn test_single_point_stroke_is_discarded() {
        let mut history = History::<Sketch>::default();
        let mut capture = StrokeCapture::new();

        // A tap never becomes a stroke: finished strokes hold at least two
        // points, so "1 + extends" points only applies from one extend up.
        capture.begin(&mut history, Point::new(3.0, 3.0), 2, red());
        assert!(!capture.end(&mut history));

        assert!(history.current().strokes.is_empty());
        assert!(!history.can_undo());
        assert!(!capture.is_active());
    }

    #[test]
    fn test_end_commits_pre_stroke_state() {
        let mut history = History::<Sketch>::default();
        let mut capture = StrokeCapture::new();

        capture.begin(&mut history, Point::new(0.0, 0.0), 2, red());
        capture.extend(&mut history, Point::new(1.0, 1.0));
        capture.end(&mut history);

        assert!(history.can_undo());
        assert!(history.undo());
        assert!(history.current().strokes.is_empty());
    }

    #[test]
    fn test_end_without_open_stroke() {
        let mut history = History::<Sketch>::default();
        let mut capture = StrokeCapture::new();
        assert!(!capture.end(&mut history));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_closed_stroke_rejects_points() {
        let mut stroke = Stroke::from_points(vec![Point::ZERO, Point::new(1.0, 1.0)], 2, red());
        assert!(!stroke.push(Point::new(2.0, 2.0)));
        assert_eq!(stroke.len(), 2);
    }

    #[test]
    fn test_stroke_bounds() {
        let stroke = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0), Point::new(50.0, 100.0)],
            2,
            red(),
        );
        let bounds = stroke.bounds();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 100.0, 100.0));
    }
}
