//! Top-level engine state.
//!
//! DESIGN
//! ======
//! `EngineCore` is the explicit application state: camera, world, animator,
//! visibility filter, bookmarks and tour live side by side and every
//! operation borrows exactly the parts it needs. Nothing is global, so the
//! whole core runs under plain unit tests.
//!
//! The host drives it with [`EngineCore::frame`] once per redraw, passing a
//! millisecond timestamp. A frame steps the animation, polls the tour timer,
//! and runs a visibility pass if the camera drifted far enough, returning
//! [`Action`]s for the host to react to.
//!
//! Exactly one driver moves the camera at a time. Direct input (drag pan,
//! wheel zoom) cancels any running animation, tour legs included, before
//! touching the camera.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, error, warn};

use crate::animation::{Animator, Callback, Step, Waypoint, navigation_duration};
use crate::bookmark::{Bookmark, BookmarkStore};
use crate::camera::{Camera, Point, Viewport};
use crate::config::EngineConfig;
use crate::consts::WHEEL_ZOOM_STEP;
use crate::easing::Easing;
use crate::error::PersistenceError;
use crate::persistence::{BlobStore, SNAPSHOT_KEY, Snapshot};
use crate::precision::{Scalar, Vector2};
use crate::shape::Shape;
use crate::tour::{TourContext, TourController, TourEndCallback, TourEvent, TourProgress};
use crate::visibility::VisibilityFilter;
use crate::world::{FilterStats, ShapeId, World, ZOrder};

/// Things the host should react to after a frame or input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RenderNeeded,
    AnimationFinished,
    Refiltered { activated: usize, cached: usize },
    TourAdvanced { index: usize },
    TourEnded,
}

pub struct EngineCore<S: Shape> {
    pub config: EngineConfig,
    pub camera: Camera,
    pub world: World<S>,
    pub bookmarks: BookmarkStore,
    animator: Animator,
    filter: VisibilityFilter,
    tour: TourController,
    viewport_width: f64,
    viewport_height: f64,
    /// Timestamp of the latest frame, used to start animations from input.
    now_ms: f64,
}

impl<S: Shape> std::fmt::Debug for EngineCore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCore")
            .field("camera", &self.camera)
            .field("shapes", &self.world.len())
            .field("bookmarks", &self.bookmarks.len())
            .field("animator", &self.animator)
            .field("tour", &self.tour)
            .finish_non_exhaustive()
    }
}

impl<S: Shape> Default for EngineCore<S> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: Shape> EngineCore<S> {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            camera: Camera::new(config.camera.clone()),
            config,
            world: World::new(),
            bookmarks: BookmarkStore::new(),
            animator: Animator::new(),
            filter: VisibilityFilter::new(),
            tour: TourController::new(),
            viewport_width: 1.0,
            viewport_height: 1.0,
            now_ms: 0.0,
        }
    }

    // --- Viewport ---

    /// Update the surface size in CSS pixels. Forces a visibility pass on the
    /// next frame.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.filter.invalidate();
    }

    /// World/screen mapping for the current camera.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(&self.camera, self.viewport_width, self.viewport_height)
    }

    #[must_use]
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> Vector2 {
        self.viewport().screen_to_world(sx, sy)
    }

    #[must_use]
    pub fn world_to_screen(&self, world: &Vector2) -> Point {
        self.viewport().world_to_screen(world)
    }

    #[must_use]
    pub fn world_length_to_screen(&self, len: &Scalar) -> f64 {
        self.viewport().world_length_to_screen(len)
    }

    // --- Frame ---

    /// Advance everything time-driven to `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> Vec<Action> {
        if now_ms.is_finite() && now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        let mut actions = Vec::new();

        match self.animator.step(&mut self.camera, self.now_ms) {
            Step::Idle => {}
            Step::Running { .. } | Step::LegComplete { .. } => actions.push(Action::RenderNeeded),
            Step::Finished => {
                actions.push(Action::RenderNeeded);
                actions.push(Action::AnimationFinished);
            }
        }

        match self.with_tour(TourController::poll) {
            Some(TourEvent::Advanced { index }) => actions.push(Action::TourAdvanced { index }),
            Some(TourEvent::Ended) => actions.push(Action::TourEnded),
            None => {}
        }

        if let Some(stats) = self.refilter_if_needed() {
            actions.push(Action::Refiltered { activated: stats.activated, cached: stats.cached });
            if stats.activated + stats.cached > 0 && !actions.contains(&Action::RenderNeeded) {
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    /// Run a visibility pass if the camera moved past the hysteresis
    /// thresholds since the previous one.
    pub fn refilter_if_needed(&mut self) -> Option<FilterStats> {
        if !self.filter.should_refilter(&self.camera, &self.config.visibility) {
            return None;
        }
        Some(self.refilter())
    }

    /// Unconditional visibility pass.
    pub fn refilter(&mut self) -> FilterStats {
        debug!(drift = ?self.filter.relative_drift(&self.camera), "refilter");
        let viewport = self.viewport();
        let stats = self.world.refilter(&viewport, &self.config.visibility);
        self.filter.mark(&self.camera);
        stats
    }

    /// Paint the active shapes in z-order.
    pub fn render(&self, canvas: &mut S::Canvas) {
        self.world.render(canvas, &self.viewport());
    }

    // --- Direct input ---

    /// Drag-pan by a screen-space delta. Content follows the pointer, so the
    /// camera moves the opposite way.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        self.interrupt();
        let viewport = self.viewport();
        let delta = Vector2::new(viewport.screen_length_to_world(dx), viewport.screen_length_to_world(dy));
        let pos = &self.camera.pos - &delta;
        let range = self.camera.range.clone();
        self.camera.jump_to(pos, &range);
        vec![Action::RenderNeeded]
    }

    /// Zoom by `factor` (range multiplier; below 1 zooms in) while keeping the
    /// world point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> Vec<Action> {
        if !factor.is_finite() || factor <= 0.0 {
            return Vec::new();
        }
        self.interrupt();
        let before = self.screen_to_world(anchor.x, anchor.y);
        let range = self.camera.clamp_range(&self.camera.range.scale(factor));
        let pos = self.camera.pos.clone();
        self.camera.jump_to(pos, &range);
        let after = self.screen_to_world(anchor.x, anchor.y);
        let pos = &self.camera.pos + &(&before - &after);
        self.camera.jump_to(pos, &range);
        vec![Action::RenderNeeded]
    }

    /// Wheel zoom around the pointer. Positive `notches` zoom out.
    pub fn zoom_wheel(&mut self, anchor: Point, notches: f64) -> Vec<Action> {
        self.zoom_at(anchor, WHEEL_ZOOM_STEP.powf(notches))
    }

    /// Stop whatever is driving the camera so direct input owns it.
    fn interrupt(&mut self) {
        if self.animator.is_animating() {
            self.animator.cancel(&mut self.camera);
        }
    }

    // --- Programmatic navigation ---

    /// Animate to a view. Supersedes any running animation.
    pub fn animate_to(
        &mut self,
        pos: Vector2,
        range: Scalar,
        duration_ms: f64,
        easing: Easing,
        on_complete: Option<Callback>,
    ) {
        self.animator.animate_to(
            &mut self.camera,
            Waypoint::new(pos, range),
            duration_ms,
            easing,
            self.now_ms,
            on_complete,
        );
    }

    /// Animate through `points` one after another.
    pub fn animate_through_points(&mut self, points: Vec<Waypoint>, easing: Easing, on_complete: Option<Callback>) {
        self.animator.animate_through_points(
            &mut self.camera,
            points,
            easing,
            self.now_ms,
            &self.config.animation,
            on_complete,
        );
    }

    /// Animate to a view with a duration proportional to how far the jump is
    /// relative to the current zoom.
    pub fn navigate_to(&mut self, pos: Vector2, range: Scalar, easing: Easing) {
        let duration = navigation_duration(&self.camera, &pos, &self.config.animation);
        self.animate_to(pos, range, duration, easing, None);
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    // --- Shapes ---

    pub fn add_shape(&mut self, shape: S) -> ShapeId {
        self.world.insert(shape)
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> bool {
        self.world.remove(id).is_some()
    }

    /// Move shapes by a screen-space delta.
    pub fn move_shapes_by_screen(&mut self, ids: &[ShapeId], dx: f64, dy: f64) -> usize {
        let viewport = self.viewport();
        let (dx, dy) = (viewport.screen_length_to_world(dx), viewport.screen_length_to_world(dy));
        self.world.move_shapes(ids, &dx, &dy)
    }

    pub fn reorder_shape(&mut self, id: ShapeId, order: ZOrder) -> bool {
        self.world.reorder(id, order)
    }

    #[must_use]
    pub fn hit_test(&self, sx: f64, sy: f64) -> Option<ShapeId> {
        self.world.hit_test(&self.viewport(), sx, sy)
    }

    // --- Bookmarks ---

    /// Bookmark the current view.
    pub fn add_bookmark(&mut self, name: Option<&str>) -> Bookmark {
        self.bookmarks.add(&self.camera, name).clone()
    }

    pub fn edit_bookmark(&mut self, id: &str, name: &str) -> bool {
        self.bookmarks.edit(id, name)
    }

    pub fn describe_bookmark(&mut self, id: &str, description: &str) -> bool {
        self.bookmarks.describe(id, description)
    }

    /// Delete a bookmark. A running tour keeps its place in the shortened
    /// list, so no remaining stop is skipped.
    pub fn remove_bookmark(&mut self, id: &str) -> bool {
        let Some(index) = self.bookmarks.index_of(id) else {
            warn!(id, "remove: unknown bookmark");
            return false;
        };
        if self.bookmarks.remove(id).is_none() {
            return false;
        }
        self.tour.bookmark_removed(index);
        true
    }

    pub fn reorder_bookmarks(&mut self, from: usize, to: usize) -> bool {
        self.bookmarks.reorder(from, to)
    }

    #[must_use]
    pub fn search_bookmarks(&self, query: &str) -> Vec<&Bookmark> {
        self.bookmarks.search(query)
    }

    /// Navigate to a bookmark by id, routing through the bookmarks between
    /// the current tour position and the target.
    pub fn go_to_bookmark(&mut self, id: &str) -> bool {
        let Some(index) = self.bookmarks.index_of(id) else {
            debug!(id, "go_to_bookmark: unknown bookmark");
            return false;
        };
        self.with_tour(|tour, ctx| tour.go_to(ctx, index))
    }

    // --- Tour ---

    pub fn play_tour(&mut self) -> bool {
        self.with_tour(TourController::play)
    }

    pub fn stop_tour(&mut self) {
        self.tour.stop();
    }

    pub fn toggle_play_pause(&mut self) -> bool {
        self.with_tour(TourController::toggle_play_pause)
    }

    pub fn next_bookmark(&mut self) -> bool {
        self.with_tour(TourController::next_bookmark)
    }

    pub fn previous_bookmark(&mut self) -> bool {
        self.with_tour(TourController::previous_bookmark)
    }

    pub fn set_on_tour_end(&mut self, callback: Option<TourEndCallback>) {
        self.tour.set_on_tour_end(callback);
    }

    #[must_use]
    pub fn is_tour_playing(&self) -> bool {
        self.tour.is_playing()
    }

    #[must_use]
    pub fn current_tour_index(&self) -> Option<usize> {
        self.tour.current_index()
    }

    #[must_use]
    pub fn tour_progress(&self) -> Option<TourProgress> {
        self.tour.progress(&self.bookmarks)
    }

    fn with_tour<R>(&mut self, f: impl FnOnce(&mut TourController, &mut TourContext<'_>) -> R) -> R {
        let mut ctx = TourContext {
            bookmarks: &self.bookmarks,
            camera: &mut self.camera,
            animator: &mut self.animator,
            config: &self.config,
            now_ms: self.now_ms,
        };
        f(&mut self.tour, &mut ctx)
    }

    // --- Persistence ---

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.camera, self.bookmarks.as_slice())
    }

    /// Persist camera and bookmarks. On failure the in-memory state is
    /// untouched and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if encoding or the store write fails.
    pub async fn save_to(&self, store: &dyn BlobStore) -> Result<(), PersistenceError> {
        let blob = self.snapshot().encode()?;
        store.save(SNAPSHOT_KEY, blob).await.inspect_err(|e| {
            error!(error = %e, "snapshot save failed");
        })
    }

    /// Restore camera and bookmarks. A missing or malformed snapshot resets
    /// to the default camera and an empty bookmark list.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the store read fails; state is left
    /// untouched in that case.
    pub async fn load_from(&mut self, store: &dyn BlobStore) -> Result<(), PersistenceError> {
        let blob = store.load(SNAPSHOT_KEY).await.inspect_err(|e| {
            error!(error = %e, "snapshot load failed");
        })?;
        let snapshot = match blob {
            Some(bytes) => Snapshot::decode(&bytes, &self.config.camera),
            None => Snapshot::fallback(&self.config.camera),
        };
        self.apply_snapshot(snapshot);
        Ok(())
    }

    /// Replace camera and bookmarks, stopping any animation or tour.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.tour.stop();
        self.animator.cancel(&mut self.camera);
        snapshot.restore_camera(&mut self.camera);
        self.bookmarks = BookmarkStore::from_list(snapshot.bookmarks);
        self.filter.invalidate();
    }
}
