#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::config::CameraConfig;
use crate::precision::{Scalar, Vector2};
use crate::shape::WorldRect;

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pos` is the world point at the viewport center. `range` is the
/// world-space height spanned by the viewport, so a smaller range means a
/// deeper zoom. `target_pos` / `target_range` hold the destination of the
/// current animation, or the current view when idle.
///
/// Every range written through this type is clamped into the configured
/// bounds, which keeps `range > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub pos: Vector2,
    pub range: Scalar,
    pub target_pos: Vector2,
    pub target_range: Scalar,
    bounds: CameraConfig,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    /// A camera at the world origin with the configured default range.
    #[must_use]
    pub fn new(bounds: CameraConfig) -> Self {
        let range = bounds.clamp_range(&bounds.default_range);
        Self { pos: Vector2::zero(), range: range.clone(), target_pos: Vector2::zero(), target_range: range, bounds }
    }

    #[must_use]
    pub fn bounds(&self) -> &CameraConfig {
        &self.bounds
    }

    /// Clamp a range request into the supported bounds.
    #[must_use]
    pub fn clamp_range(&self, range: &Scalar) -> Scalar {
        self.bounds.clamp_range(range)
    }

    /// Move the view immediately, syncing the targets to the new view.
    pub fn jump_to(&mut self, pos: Vector2, range: &Scalar) {
        let range = self.clamp_range(range);
        self.target_pos = pos.clone();
        self.target_range = range.clone();
        self.pos = pos;
        self.range = range;
    }

    /// Record an animation destination. The range is clamped silently.
    pub fn set_target(&mut self, pos: Vector2, range: &Scalar) {
        self.target_pos = pos;
        self.target_range = self.clamp_range(range);
    }

    /// Write one interpolated frame without touching the targets.
    pub fn set_view(&mut self, pos: Vector2, range: &Scalar) {
        self.pos = pos;
        self.range = self.clamp_range(range);
    }
}

/// World/screen mapping for one frame.
///
/// Built from a camera and the surface size. All world arithmetic stays in
/// [`Scalar`]; only the final pixel placement converts to `f64`.
#[derive(Debug, Clone)]
pub struct Viewport {
    pos: Vector2,
    range: Scalar,
    width: f64,
    height: f64,
    /// World units per screen pixel.
    units_per_px: Scalar,
    /// Screen pixels per world unit.
    px_per_unit: Scalar,
}

impl Viewport {
    /// Degenerate surface sizes are treated as one pixel.
    #[must_use]
    pub fn new(camera: &Camera, width: f64, height: f64) -> Self {
        let width = if width.is_finite() { width.max(1.0) } else { 1.0 };
        let height = if height.is_finite() { height.max(1.0) } else { 1.0 };
        let screen_height = Scalar::from_f64_lossy(height);
        Self {
            pos: camera.pos.clone(),
            range: camera.range.clone(),
            width,
            height,
            units_per_px: &camera.range / &screen_height,
            px_per_unit: &screen_height / &camera.range,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn range(&self) -> &Scalar {
        &self.range
    }

    /// Convert a screen-space point to world coordinates.
    ///
    /// `world = pos + (screen - center) * (range / screen_height)`
    #[must_use]
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> Vector2 {
        let offset = Vector2::from_f64(sx - self.width / 2.0, sy - self.height / 2.0);
        &self.pos + &(&offset * &self.units_per_px)
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: &Vector2) -> Point {
        let rel = &(world - &self.pos) * &self.px_per_unit;
        Point { x: rel.x.to_f64() + self.width / 2.0, y: rel.y.to_f64() + self.height / 2.0 }
    }

    /// Convert a world-space length to pixels: `len * screen_height / range`.
    #[must_use]
    pub fn world_length_to_screen(&self, len: &Scalar) -> f64 {
        (len * &self.px_per_unit).to_f64()
    }

    /// Convert a pixel distance to a world-space length.
    #[must_use]
    pub fn screen_length_to_world(&self, px: f64) -> Scalar {
        &Scalar::from_f64_lossy(px) * &self.units_per_px
    }

    /// World rectangle covered by the viewport, grown by `margin` viewport
    /// sizes on every side.
    #[must_use]
    pub fn world_bounds(&self, margin: f64) -> WorldRect {
        let half_w = self.screen_length_to_world(self.width * (0.5 + margin));
        let half_h = self.screen_length_to_world(self.height * (0.5 + margin));
        let half = Vector2::new(half_w, half_h);
        WorldRect::new(&self.pos - &half, &self.pos + &half)
    }
}
