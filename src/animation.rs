//! Camera animation engine.
//!
//! DESIGN
//! ======
//! The animator is a two-state machine: idle, or driving one transition
//! from a start view to a target view. The host calls [`Animator::step`]
//! once per frame with a wall-clock timestamp; progress is derived from
//! elapsed time, so speed does not depend on frame rate.
//!
//! There is no queue of independent animations. Starting a new animation
//! while one is running restarts from wherever the camera is right now and
//! drops the old one (its callback never fires). Multi-waypoint paths are a
//! list of pending legs owned by the single active animation; the next leg
//! starts only on the frame where the previous one reaches its target.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::camera::Camera;
use crate::config::AnimationConfig;
use crate::easing::Easing;
use crate::precision::{Scalar, Vector2};

/// Fired once when an animation (including every waypoint leg) completes.
pub type Callback = Box<dyn FnOnce()>;

/// A camera destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    pub pos: Vector2,
    pub range: Scalar,
}

impl Waypoint {
    #[must_use]
    pub fn new(pos: Vector2, range: Scalar) -> Self {
        Self { pos, range }
    }
}

/// Result of advancing the animator by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Nothing is animating.
    Idle,
    /// Mid-flight; `progress` is in `[0, 1)`.
    Running { progress: f64 },
    /// A waypoint leg landed exactly on its target and the next leg started.
    LegComplete { remaining: usize },
    /// The final target was reached exactly and the callback fired.
    Finished,
}

#[derive(Debug, Clone)]
struct Leg {
    target: Waypoint,
    duration_ms: f64,
    easing: Easing,
}

#[derive(Debug, Clone)]
struct Transition {
    start_pos: Vector2,
    start_range: Scalar,
    target: Waypoint,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
    last_progress: f64,
}

impl Transition {
    fn progress(&mut self, now_ms: f64) -> f64 {
        let raw = if self.duration_ms > 0.0 && now_ms.is_finite() {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        // Frames never run backwards, even if the host clock does.
        self.last_progress = raw.max(self.last_progress);
        self.last_progress
    }
}

#[derive(Default)]
pub struct Animator {
    current: Option<Transition>,
    pending: VecDeque<Leg>,
    on_complete: Option<Callback>,
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("current", &self.current)
            .field("pending", &self.pending)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Animator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }

    /// Legs still queued behind the active one.
    #[must_use]
    pub fn pending_legs(&self) -> usize {
        self.pending.len()
    }

    /// Animate from the camera's current view to `target`.
    ///
    /// Supersedes anything in flight. The target range is clamped into the
    /// camera bounds.
    pub fn animate_to(
        &mut self,
        camera: &mut Camera,
        target: Waypoint,
        duration_ms: f64,
        easing: Easing,
        now_ms: f64,
        on_complete: Option<Callback>,
    ) {
        self.pending.clear();
        self.on_complete = on_complete;
        self.begin(camera, Leg { target, duration_ms, easing }, now_ms);
    }

    /// Animate through each waypoint in order, one leg at a time.
    ///
    /// Intermediate legs take `leg_ms`, the final leg `final_leg_ms`; both are
    /// stretched for easings with visible perturbations. An empty list is a
    /// no-op and leaves any running animation alone.
    pub fn animate_through_points(
        &mut self,
        camera: &mut Camera,
        points: Vec<Waypoint>,
        easing: Easing,
        now_ms: f64,
        config: &AnimationConfig,
        on_complete: Option<Callback>,
    ) {
        let count = points.len();
        let mut legs: VecDeque<Leg> = points
            .into_iter()
            .enumerate()
            .map(|(i, target)| Leg { target, duration_ms: leg_duration(i, count, easing, config), easing })
            .collect();
        let Some(first) = legs.pop_front() else {
            return;
        };

        debug!(legs = count, easing = easing.name(), "waypoint animation started");
        self.on_complete = on_complete;
        self.pending = legs;
        self.begin(camera, first, now_ms);
    }

    /// Drop the running animation without firing its callback.
    /// The camera stays where it is and its targets snap to the current view.
    pub fn cancel(&mut self, camera: &mut Camera) {
        if self.current.take().is_some() {
            debug!("animation cancelled");
        }
        self.pending.clear();
        self.on_complete = None;
        let (pos, range) = (camera.pos.clone(), camera.range.clone());
        camera.set_target(pos, &range);
    }

    /// Advance the active animation to `now_ms`.
    pub fn step(&mut self, camera: &mut Camera, now_ms: f64) -> Step {
        let Some(transition) = self.current.as_mut() else {
            return Step::Idle;
        };

        let progress = transition.progress(now_ms);
        if progress < 1.0 {
            let eased = transition.easing.frame(progress);
            let range = range_at(&transition.start_range, &transition.target.range, eased.range);
            let mut pos = transition.start_pos.lerp(&transition.target.pos, eased.pos);
            if eased.offset != (0.0, 0.0) {
                let offset = &Vector2::from_f64(eased.offset.0, eased.offset.1) * &range;
                pos = &pos + &offset;
            }
            camera.set_view(pos, &range);
            return Step::Running { progress };
        }

        // Land exactly on the target, never merely close to it.
        let target = transition.target.clone();
        camera.set_view(target.pos, &target.range);

        if let Some(next) = self.pending.pop_front() {
            let remaining = self.pending.len();
            self.begin(camera, next, now_ms);
            return Step::LegComplete { remaining };
        }

        self.current = None;
        debug!("animation finished");
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
        Step::Finished
    }

    fn begin(&mut self, camera: &mut Camera, leg: Leg, now_ms: f64) {
        camera.set_target(leg.target.pos, &leg.target.range);
        self.current = Some(Transition {
            start_pos: camera.pos.clone(),
            start_range: camera.range.clone(),
            target: Waypoint { pos: camera.target_pos.clone(), range: camera.target_range.clone() },
            start_ms: now_ms,
            duration_ms: leg.duration_ms.max(0.0),
            easing: leg.easing,
            last_progress: 0.0,
        });
    }
}

/// Duration for direct navigation from the camera's view to `target_pos`.
///
/// `base * (1 + relative_distance * 0.5)` clamped to `[base, max]`, where the
/// distance is measured in units of the current range. Jumps that are large
/// relative to the current zoom take longer regardless of absolute distance.
#[must_use]
pub fn navigation_duration(camera: &Camera, target_pos: &Vector2, config: &AnimationConfig) -> f64 {
    let distance = (target_pos - &camera.pos).magnitude();
    let relative = (&distance / &camera.range).to_f64();
    let base = config.base_duration_ms;
    let max = config.max_duration_ms.max(base);
    if !relative.is_finite() {
        return max;
    }
    (base * (1.0 + relative * 0.5)).max(base).min(max)
}

/// Duration of leg `index` in a path of `count` waypoints.
#[must_use]
pub fn leg_duration(index: usize, count: usize, easing: Easing, config: &AnimationConfig) -> f64 {
    let base = if index + 1 == count { config.final_leg_ms } else { config.leg_ms };
    if easing.is_complex() { base * config.complex_multiplier } else { base }
}

/// Range for interpolation factor `factor`. Linear inside `[0, 1]`; beyond
/// either end the excess is applied geometrically, so an overshooting easing
/// swings the range by a ratio of the zoom and it stays positive.
fn range_at(start: &Scalar, target: &Scalar, factor: f64) -> Scalar {
    if (0.0..=1.0).contains(&factor) {
        return start.lerp(target, factor);
    }
    let (Some(from), Some(to)) = (start.log10(), target.log10()) else {
        return start.lerp(target, factor);
    };
    let (base, excess) = if factor > 1.0 { (target, factor - 1.0) } else { (start, factor) };
    match Scalar::pow10((to - from) * excess) {
        Some(ratio) => base * &ratio,
        None => base.clone(),
    }
}
