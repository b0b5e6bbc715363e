//! Hysteresis trigger for visibility culling.
//!
//! Reclassifying every shape each frame is wasteful, so a pass only runs
//! once the camera has moved far enough from where the previous pass ran:
//! a pan of at least `pan_fraction * range`, or a change of at least
//! `log_zoom_delta` in `log10(range)`. The pass itself lives on
//! [`World::refilter`](crate::world::World::refilter).

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use crate::camera::Camera;
use crate::config::VisibilityConfig;
use crate::precision::{Scalar, Vector2};

/// Camera state recorded at the last filter pass.
#[derive(Debug, Clone, PartialEq)]
struct Anchor {
    pos: Vector2,
    log_range: f64,
}

#[derive(Debug, Clone, Default)]
pub struct VisibilityFilter {
    anchor: Option<Anchor>,
}

impl VisibilityFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the camera has drifted far enough to warrant a pass.
    /// Always true before the first pass.
    #[must_use]
    pub fn should_refilter(&self, camera: &Camera, config: &VisibilityConfig) -> bool {
        let Some(anchor) = &self.anchor else {
            return true;
        };

        let threshold = camera.range.scale(config.pan_fraction);
        let moved = (&camera.pos - &anchor.pos).magnitude_squared();
        if moved >= &threshold * &threshold {
            return true;
        }

        let log_range = camera.range.log10().unwrap_or(anchor.log_range);
        (log_range - anchor.log_range).abs() >= config.log_zoom_delta
    }

    /// Record the camera state a pass just ran against.
    pub fn mark(&mut self, camera: &Camera) {
        let log_range = camera.range.log10().unwrap_or(0.0);
        self.anchor = Some(Anchor { pos: camera.pos.clone(), log_range });
    }

    /// Forget the anchor so the next check forces a pass.
    pub fn invalidate(&mut self) {
        self.anchor = None;
    }

    /// Pan distance from the anchor, in units of the current range.
    #[must_use]
    pub fn relative_drift(&self, camera: &Camera) -> Option<f64> {
        let anchor = self.anchor.as_ref()?;
        let drift: Scalar = (&camera.pos - &anchor.pos).magnitude();
        Some((&drift / &camera.range).to_f64())
    }
}
