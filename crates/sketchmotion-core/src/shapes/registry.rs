//! Ordered collection of placed shapes plus the selection pointer.

use super::{Shape, ShapeKind};
use crate::geometry::{HexColor, random_color};
use kurbo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ranges a new shape is placed within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_size: f64,
    pub max_size: f64,
}

impl Default for PlacementBounds {
    fn default() -> Self {
        Self {
            min_x: 50.0,
            max_x: 450.0,
            min_y: 50.0,
            max_y: 350.0,
            min_size: 20.0,
            max_size: 60.0,
        }
    }
}

impl PlacementBounds {
    pub fn contains(&self, shape: &Shape) -> bool {
        (self.min_x..=self.max_x).contains(&shape.position.x)
            && (self.min_y..=self.max_y).contains(&shape.position.y)
            && (self.min_size..=self.max_size).contains(&shape.size)
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min { rng.gen_range(min..=max) } else { min }
}

/// Owns the placed shapes in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
    #[serde(skip)]
    selected: Option<usize>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new shape at a random position and size within `bounds`.
    /// Returns the new shape's index.
    pub fn add_shape<R: Rng + ?Sized>(
        &mut self,
        kind: ShapeKind,
        color: HexColor,
        bounds: &PlacementBounds,
        rng: &mut R,
    ) -> usize {
        let index = self.shapes.len();
        let position = Point::new(
            sample(rng, bounds.min_x, bounds.max_x),
            sample(rng, bounds.min_y, bounds.max_y),
        );
        let size = sample(rng, bounds.min_size, bounds.max_size);
        let border = random_color(rng);

        self.shapes
            .push(Shape::new(kind, position, size, color, border, index));
        log::debug!("Added {kind} #{index} at ({:.1}, {:.1})", position.x, position.y);
        index
    }

    /// Select the shape at `index`. Out-of-range indices are ignored.
    pub fn select_shape(&mut self, index: usize) -> bool {
        if index >= self.shapes.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.and_then(|i| self.shapes.get(i))
    }

    /// Move the shape at `index`. Out-of-range indices are ignored.
    pub fn move_shape(&mut self, index: usize, x: f64, y: f64) -> bool {
        match self.shapes.get_mut(index) {
            Some(shape) => {
                shape.position = Point::new(x, y);
                true
            }
            None => false,
        }
    }

    /// Topmost shape containing `point`, drawn at `scale`.
    pub fn shape_at(&self, point: Point, scale: f64) -> Option<usize> {
        self.shapes
            .iter()
            .rposition(|shape| shape.hit_test(point, scale))
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_add_shape_on_empty_registry() {
        let mut registry = ShapeRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);
        let red = HexColor::parse("#ff0000").unwrap();

        let bounds = PlacementBounds::default();
        let index = registry.add_shape(ShapeKind::Circle, red, &bounds, &mut rng);

        assert_eq!(index, 0);
        assert_eq!(registry.len(), 1);
        let shape = registry.get(0).unwrap();
        assert_eq!(shape.kind, ShapeKind::Circle);
        assert_eq!(shape.fill_color, red);
        assert_eq!(shape.index, 0);
        assert_eq!(shape.rotation, 0.0);
    }

    #[test]
    fn test_placement_stays_in_bounds() {
        let mut registry = ShapeRegistry::new();
        let mut rng = StdRng::seed_from_u64(42);
        let bounds = PlacementBounds::default();

        for i in 0..200 {
            let kind = ShapeKind::ALL[i % 4];
            registry.add_shape(kind, HexColor::black(), &bounds, &mut rng);
        }

        for (i, shape) in registry.shapes().iter().enumerate() {
            assert_eq!(shape.index, i);
            assert!(bounds.contains(shape), "shape {i} out of bounds: {shape:?}");
        }
    }

    #[test]
    fn test_seeded_placement_is_reproducible() {
        let bounds = PlacementBounds::default();
        let mut a = ShapeRegistry::new();
        let mut b = ShapeRegistry::new();
        a.add_shape(ShapeKind::Square, HexColor::black(), &bounds, &mut StdRng::seed_from_u64(9));
        b.add_shape(ShapeKind::Square, HexColor::black(), &bounds, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_bounds() {
        let bounds = PlacementBounds {
            min_x: 10.0,
            max_x: 10.0,
            min_y: 20.0,
            max_y: 20.0,
            min_size: 30.0,
            max_size: 30.0,
        };
        let mut registry = ShapeRegistry::new();
        let mut rng = StdRng::seed_from_u64(0);
        registry.add_shape(ShapeKind::Triangle, HexColor::black(), &bounds, &mut rng);
        let shape = registry.get(0).unwrap();
        assert_eq!(shape.position, Point::new(10.0, 20.0));
        assert_eq!(shape.size, 30.0);
    }

    #[test]
    fn test_select_shape() {
        let mut registry = ShapeRegistry::new();
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = PlacementBounds::default();
        registry.add_shape(ShapeKind::Circle, HexColor::black(), &bounds, &mut rng);
        registry.add_shape(ShapeKind::Square, HexColor::black(), &bounds, &mut rng);
        let before = registry.shapes().to_vec();

        assert!(registry.select_shape(1));
        assert_eq!(registry.selected(), Some(1));
        assert!(registry.select_shape(0));
        assert_eq!(registry.selected(), Some(0));

        // Out of range leaves the selection alone.
        assert!(!registry.select_shape(7));
        assert_eq!(registry.selected(), Some(0));
        assert_eq!(registry.shapes(), before.as_slice());

        registry.deselect();
        assert_eq!(registry.selected(), None);
    }

    #[test]
    fn test_move_shape() {
        let mut registry = ShapeRegistry::new();
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = PlacementBounds::default();
        registry.add_shape(ShapeKind::Hexagon, HexColor::black(), &bounds, &mut rng);
        let size = registry.get(0).unwrap().size;

        assert!(registry.move_shape(0, 12.0, 34.0));
        let shape = registry.get(0).unwrap();
        assert_eq!(shape.position, Point::new(12.0, 34.0));
        assert_eq!(shape.size, size);

        let snapshot = registry.clone();
        assert!(!registry.move_shape(3, 0.0, 0.0));
        assert_eq!(registry, snapshot);
    }

    #[test]
    fn test_shape_at_prefers_topmost() {
        let mut registry = ShapeRegistry::new();
        let mut rng = StdRng::seed_from_u64(8);
        let bounds = PlacementBounds::default();
        registry.add_shape(ShapeKind::Circle, HexColor::black(), &bounds, &mut rng);
        registry.add_shape(ShapeKind::Circle, HexColor::black(), &bounds, &mut rng);
        registry.move_shape(0, 200.0, 200.0);
        registry.move_shape(1, 205.0, 200.0);

        assert_eq!(registry.shape_at(Point::new(202.0, 200.0), 1.0), Some(1));
        assert_eq!(registry.shape_at(Point::new(10.0, 10.0), 1.0), None);
    }
}
