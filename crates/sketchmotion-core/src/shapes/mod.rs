//! Placeable, animatable shapes.

mod registry;

pub use registry::{PlacementBounds, ShapeRegistry};

use crate::geometry::{HexColor, scale_about_centroid};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// The kinds of shape a user can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
    Hexagon,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Hexagon,
        ShapeKind::Triangle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Triangle => "triangle",
        }
    }

    /// Number of polygon corners (0 for circles).
    fn corners(&self) -> usize {
        match self {
            ShapeKind::Circle => 0,
            ShapeKind::Square => 4,
            ShapeKind::Hexagon => 6,
            ShapeKind::Triangle => 3,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown shape kind: {s}"))
    }
}

/// A placed shape.
///
/// The registry owns the logical attributes only; a renderer derives pixels
/// from `kind`, `position`, `size` and `rotation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Center position.
    pub position: Point,
    /// Diameter for circles, side basis for polygons.
    pub size: f64,
    pub fill_color: HexColor,
    pub border_color: HexColor,
    /// Rotation in degrees, kept in `[0, 360)`.
    pub rotation: f64,
    /// Creation order; stable identity for selection.
    pub index: usize,
}

impl Shape {
    pub fn new(
        kind: ShapeKind,
        position: Point,
        size: f64,
        fill_color: HexColor,
        border_color: HexColor,
        index: usize,
    ) -> Self {
        Self {
            kind,
            position,
            size,
            fill_color,
            border_color,
            rotation: 0.0,
            index,
        }
    }

    /// Rotate by `degrees`, wrapping into `[0, 360)`.
    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Polygon corners at the given visual scale. Circles have none.
    pub fn outline(&self, scale: f64) -> Vec<Point> {
        let corners = self.kind.corners();
        if corners == 0 {
            return Vec::new();
        }

        let radius = match self.kind {
            // Half-diagonal so the side length equals `size`.
            ShapeKind::Square => self.size / 2.0_f64.sqrt(),
            _ => self.radius(),
        };
        // Squares sit flat; triangles point up.
        let start = match self.kind {
            ShapeKind::Square => PI / 4.0,
            ShapeKind::Triangle => -PI / 2.0,
            _ => 0.0,
        };
        let rotate = Affine::rotate_about(self.rotation.to_radians(), self.position);
        let points: Vec<Point> = (0..corners)
            .map(|i| {
                let angle = start + 2.0 * PI * i as f64 / corners as f64;
                rotate * Point::new(
                    self.position.x + radius * angle.cos(),
                    self.position.y + radius * angle.sin(),
                )
            })
            .collect();
        scale_about_centroid(&points, scale)
    }

    pub fn bounds(&self, scale: f64) -> Rect {
        let outline = self.outline(scale);
        match outline.first() {
            Some(first) => outline
                .iter()
                .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)),
            None => {
                let r = self.radius() * scale;
                Rect::new(
                    self.position.x - r,
                    self.position.y - r,
                    self.position.x + r,
                    self.position.y + r,
                )
            }
        }
    }

    /// Check if a point lies inside the shape at the given visual scale.
    pub fn hit_test(&self, point: Point, scale: f64) -> bool {
        let outline = self.outline(scale);
        if outline.is_empty() {
            return point.distance(self.position) <= self.radius() * scale;
        }
        point_in_polygon(point, &outline)
    }
}

/// Even-odd point-in-polygon test.
fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
