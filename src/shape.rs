//! Shape capability contract.
//!
//! The engine never builds concrete shapes. Hosts implement [`Shape`] for
//! their own types (circles, text, images...) and the engine only stores,
//! reorders, culls, moves and hit-tests them through this trait.

#[cfg(test)]
#[path = "shape_test.rs"]
pub(crate) mod shape_test;

use crate::camera::Viewport;
use crate::precision::{Scalar, Vector2};

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldRect {
    pub min: Vector2,
    pub max: Vector2,
}

impl WorldRect {
    /// Build from two corners in any order.
    #[must_use]
    pub fn new(a: Vector2, b: Vector2) -> Self {
        let (min_x, max_x) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
        let (min_y, max_y) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
        Self { min: Vector2::new(min_x, min_y), max: Vector2::new(max_x, max_y) }
    }

    #[must_use]
    pub fn width(&self) -> Scalar {
        &self.max.x - &self.min.x
    }

    #[must_use]
    pub fn height(&self) -> Scalar {
        &self.max.y - &self.min.y
    }

    /// Larger of width and height.
    #[must_use]
    pub fn extent(&self) -> Scalar {
        self.width().max(self.height())
    }

    /// Whether the two rectangles overlap (touching edges count).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && other.min.x <= self.max.x && self.min.y <= other.max.y && other.min.y <= self.max.y
    }
}

/// What the engine needs from a shape.
pub trait Shape {
    /// Host drawing surface handed through to [`Shape::render`].
    type Canvas: ?Sized;

    /// Whether the shape currently has anything to draw.
    fn is_renderable(&self) -> bool;

    /// Hit test against a screen-space point (CSS pixels).
    fn intersects_with_screen(&self, x: f64, y: f64, viewport: &Viewport) -> bool;

    /// Translate by a world-space delta.
    fn move_by(&mut self, dx: &Scalar, dy: &Scalar);

    fn render(&self, canvas: &mut Self::Canvas, viewport: &Viewport);

    /// World-space bounding box, used by visibility culling.
    fn world_bounds(&self) -> WorldRect;

    /// Serialized form kept for shapes parked in the cache.
    fn to_descriptor(&self) -> serde_json::Value;

    /// Rebuild a shape from [`Shape::to_descriptor`] output.
    fn from_descriptor(descriptor: &serde_json::Value) -> Option<Self>
    where
        Self: Sized;
}
