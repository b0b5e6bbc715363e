//! Tour controller: timed autoplay over the bookmark list.
//!
//! DESIGN
//! ======
//! Stopped -> Playing on [`TourController::play`], back to Stopped when the
//! last bookmark has been shown or on [`TourController::stop`]. Playback
//! owns a coarse interval timer that is polled from the frame loop; the
//! timer only decides when to start the next navigation, the camera motion
//! itself runs through the [`Animator`] like any other animation.
//!
//! Pausing flips a flag and leaves the timer and index in place, so a
//! paused tick is a no-op and resuming continues where playback stopped.
//! Stopping drops the playback state (and with it the timer) before it
//! returns, so no tick can fire afterwards.

#[cfg(test)]
#[path = "tour_test.rs"]
mod tour_test;

use std::fmt;

use tracing::{debug, warn};

use crate::animation::Animator;
use crate::bookmark::BookmarkStore;
use crate::camera::Camera;
use crate::config::EngineConfig;

/// Invoked whenever a running tour stops, explicitly or at the end.
pub type TourEndCallback = Box<dyn FnMut()>;

/// Everything a tour step needs to move the camera.
pub struct TourContext<'a> {
    pub bookmarks: &'a BookmarkStore,
    pub camera: &'a mut Camera,
    pub animator: &'a mut Animator,
    pub config: &'a EngineConfig,
    pub now_ms: f64,
}

/// Fixed-period deadline polled from the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due_ms: f64,
}

impl IntervalTimer {
    #[must_use]
    pub fn new(period_ms: f64, now_ms: f64) -> Self {
        let period_ms = period_ms.max(1.0);
        Self { period_ms, next_due_ms: now_ms + period_ms }
    }

    /// True once per elapsed period. After a long stall the schedule
    /// restarts from `now_ms` instead of firing a burst of catch-up ticks.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms += self.period_ms;
        if self.next_due_ms <= now_ms {
            self.next_due_ms = now_ms + self.period_ms;
        }
        true
    }

    #[must_use]
    pub fn next_due_ms(&self) -> f64 {
        self.next_due_ms
    }
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    paused: bool,
    timer: IntervalTimer,
}

/// What a timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    Advanced { index: usize },
    Ended,
}

/// Position in the tour for display, e.g. `"2 / 5"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourProgress {
    pub index: usize,
    pub total: usize,
}

impl fmt::Display for TourProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.index + 1, self.total)
    }
}

#[derive(Default)]
pub struct TourController {
    current_index: Option<usize>,
    playback: Option<Playback>,
    on_tour_end: Option<TourEndCallback>,
}

impl fmt::Debug for TourController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourController")
            .field("current_index", &self.current_index)
            .field("playback", &self.playback)
            .field("on_tour_end", &self.on_tour_end.is_some())
            .finish()
    }
}

impl TourController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_tour_end(&mut self, callback: Option<TourEndCallback>) {
        self.on_tour_end = callback;
    }

    /// Index of the bookmark currently shown, `None` when no tour position
    /// is set.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Playing and not paused.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_some_and(|p| !p.paused)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.playback.is_some_and(|p| p.paused)
    }

    #[must_use]
    pub fn progress(&self, bookmarks: &BookmarkStore) -> Option<TourProgress> {
        let index = self.current_index?;
        let total = bookmarks.len();
        (index < total).then_some(TourProgress { index, total })
    }

    /// Jump straight to the first bookmark and start the autoplay timer.
    /// Does nothing on an empty list.
    pub fn play(&mut self, ctx: &mut TourContext<'_>) -> bool {
        let Some(first) = ctx.bookmarks.at(0) else {
            debug!("play: no bookmarks");
            return false;
        };
        ctx.animator.cancel(ctx.camera);
        ctx.camera.jump_to(first.pos.clone(), &first.range);

        self.current_index = Some(0);
        self.playback =
            Some(Playback { paused: false, timer: IntervalTimer::new(ctx.config.tour.interval_ms, ctx.now_ms) });
        debug!(total = ctx.bookmarks.len(), "tour started");
        true
    }

    /// Stop playback, clear the timer, and reset the index. The end callback
    /// fires only if a tour was running.
    pub fn stop(&mut self) {
        self.current_index = None;
        if self.playback.take().is_none() {
            return;
        }
        debug!("tour stopped");
        if let Some(callback) = self.on_tour_end.as_mut() {
            callback();
        }
    }

    /// Pause or resume. Starts a tour when none is running.
    pub fn toggle_play_pause(&mut self, ctx: &mut TourContext<'_>) -> bool {
        match self.playback.as_mut() {
            Some(playback) => {
                playback.paused = !playback.paused;
                debug!(paused = playback.paused, "tour toggled");
                true
            }
            None => self.play(ctx),
        }
    }

    /// Poll the interval timer and advance on a due, unpaused tick.
    pub fn poll(&mut self, ctx: &mut TourContext<'_>) -> Option<TourEvent> {
        let playback = self.playback.as_mut()?;
        if !playback.timer.poll(ctx.now_ms) || playback.paused {
            return None;
        }
        Some(self.tick(ctx))
    }

    /// Advance one bookmark, or stop when the last one is already shown.
    pub fn tick(&mut self, ctx: &mut TourContext<'_>) -> TourEvent {
        let next = self.current_index.map_or(0, |i| i + 1);
        if next >= ctx.bookmarks.len() {
            self.stop();
            return TourEvent::Ended;
        }
        self.go_to(ctx, next);
        TourEvent::Advanced { index: next }
    }

    /// Step forward manually. No-op past the end or on an empty list.
    pub fn next_bookmark(&mut self, ctx: &mut TourContext<'_>) -> bool {
        let next = self.current_index.map_or(0, |i| i + 1);
        self.go_to(ctx, next)
    }

    /// Step back manually. No-op at the start or with no position set.
    pub fn previous_bookmark(&mut self, ctx: &mut TourContext<'_>) -> bool {
        match self.current_index {
            Some(i) if i > 0 => self.go_to(ctx, i - 1),
            _ => false,
        }
    }

    /// Keep the tour position on the same bookmarks after the one at
    /// `removed` is deleted. Removing the current stop steps back one, so the
    /// next tick lands on the bookmark that slid into its slot.
    pub fn bookmark_removed(&mut self, removed: usize) {
        let Some(current) = self.current_index else {
            return;
        };
        if removed > current {
            return;
        }
        self.current_index = current.checked_sub(1);
        debug!(removed, current = ?self.current_index, "tour position shifted");
    }

    /// Navigate to bookmark `index`, passing through every bookmark between
    /// the current position and the target instead of jumping straight there.
    pub fn go_to(&mut self, ctx: &mut TourContext<'_>, index: usize) -> bool {
        let bookmarks = ctx.bookmarks.as_slice();
        if index >= bookmarks.len() {
            warn!(index, total = bookmarks.len(), "tour: bookmark index out of range");
            return false;
        }

        let path: Vec<_> = match self.current_index {
            Some(from) if from < index => bookmarks[from + 1..=index].iter().map(|b| b.waypoint()).collect(),
            Some(from) if from > index && from < bookmarks.len() => {
                bookmarks[index..from].iter().rev().map(|b| b.waypoint()).collect()
            }
            _ => vec![bookmarks[index].waypoint()],
        };

        ctx.animator.animate_through_points(
            ctx.camera,
            path,
            ctx.config.tour.easing,
            ctx.now_ms,
            &ctx.config.animation,
            None,
        );
        self.current_index = Some(index);
        debug!(index, "tour moved");
        true
    }
}
