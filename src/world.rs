//! World store: one slot per logical shape, in paint order.
//!
//! DESIGN
//! ======
//! Each shape lives in exactly one slot, tagged either `Active` (painted and
//! hit-tested) or `Cached` (parked by the visibility filter, optionally in
//! serialized form). Slot order is paint order: index 0 is painted first and
//! therefore sits at the bottom. Reordering moves whole slots, so cached
//! shapes keep their place relative to active ones.
//!
//! Handles are stable [`ShapeId`]s; indices shift as shapes are reordered
//! or removed.

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::camera::Viewport;
use crate::config::VisibilityConfig;
use crate::precision::Scalar;
use crate::shape::{Shape, WorldRect};

/// Stable handle for a shape in the [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// A shape parked out of the live set.
#[derive(Debug, Clone)]
pub enum Cached<S> {
    Live(S),
    /// Serialized descriptor plus the bounds needed to decide reactivation.
    Serialized { descriptor: serde_json::Value, bounds: WorldRect },
}

#[derive(Debug, Clone)]
pub enum Slot<S> {
    Active(S),
    Cached(Cached<S>),
}

impl<S> Slot<S> {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// The shape, unless it only exists in serialized form.
    #[must_use]
    pub fn shape(&self) -> Option<&S> {
        match self {
            Self::Active(shape) | Self::Cached(Cached::Live(shape)) => Some(shape),
            Self::Cached(Cached::Serialized { .. }) => None,
        }
    }

    fn shape_mut(&mut self) -> Option<&mut S> {
        match self {
            Self::Active(shape) | Self::Cached(Cached::Live(shape)) => Some(shape),
            Self::Cached(Cached::Serialized { .. }) => None,
        }
    }
}

/// Outcome of a visibility pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub activated: usize,
    pub cached: usize,
}

/// Z-order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Top,
    Forward,
    Backward,
    Bottom,
}

/// All shapes known to the engine, in paint order.
#[derive(Debug)]
pub struct World<S> {
    slots: IndexMap<ShapeId, Slot<S>>,
    next_id: u64,
}

impl<S> Default for World<S> {
    fn default() -> Self {
        Self { slots: IndexMap::new(), next_id: 1 }
    }
}

impl<S: Shape> World<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of the paint order.
    pub fn insert(&mut self, shape: S) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.slots.insert(id, Slot::Active(shape));
        id
    }

    /// Remove a shape. Unknown ids are ignored.
    pub fn remove(&mut self, id: ShapeId) -> Option<Slot<S>> {
        let removed = self.slots.shift_remove(&id);
        if removed.is_none() {
            warn!(%id, "remove: unknown shape");
        }
        removed
    }

    #[must_use]
    pub fn slot(&self, id: ShapeId) -> Option<&Slot<S>> {
        self.slots.get(&id)
    }

    /// Paint index of a shape (0 = bottom).
    #[must_use]
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.slots.get_index_of(&id)
    }

    /// All ids in paint order, active and cached.
    #[must_use]
    pub fn ids(&self) -> Vec<ShapeId> {
        self.slots.keys().copied().collect()
    }

    /// Active shapes in paint order.
    pub fn active(&self) -> impl Iterator<Item = (ShapeId, &S)> {
        self.slots.iter().filter_map(|(id, slot)| match slot {
            Slot::Active(shape) => Some((*id, shape)),
            Slot::Cached(_) => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_active()).count()
    }

    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.slots.len() - self.active_count()
    }

    // --- Z-order ---

    /// Apply a z-order change. Returns false (and does nothing) when the id is
    /// unknown or the shape is already at the relevant bound.
    pub fn reorder(&mut self, id: ShapeId, order: ZOrder) -> bool {
        match order {
            ZOrder::Top => self.move_to_top(id),
            ZOrder::Forward => self.move_forward(id),
            ZOrder::Backward => self.move_backward(id),
            ZOrder::Bottom => self.move_to_bottom(id),
        }
    }

    /// Move to the last slot so it is painted last.
    pub fn move_to_top(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.lookup(id, "move_to_top") else {
            return false;
        };
        let last = self.slots.len() - 1;
        self.slots.move_index(index, last);
        index != last
    }

    /// Move to slot 0 so it is painted first.
    pub fn move_to_bottom(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.lookup(id, "move_to_bottom") else {
            return false;
        };
        self.slots.move_index(index, 0);
        index != 0
    }

    /// Swap with the next slot up.
    pub fn move_forward(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.lookup(id, "move_forward") else {
            return false;
        };
        if index + 1 >= self.slots.len() {
            return false;
        }
        self.slots.swap_indices(index, index + 1);
        true
    }

    /// Swap with the next slot down.
    pub fn move_backward(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.lookup(id, "move_backward") else {
            return false;
        };
        if index == 0 {
            return false;
        }
        self.slots.swap_indices(index, index - 1);
        true
    }

    fn lookup(&self, id: ShapeId, op: &'static str) -> Option<usize> {
        let index = self.slots.get_index_of(&id);
        if index.is_none() {
            warn!(%id, op, "z-order: unknown shape");
        }
        index
    }

    // --- Shape operations ---

    /// Translate shapes by a world-space delta. Returns how many moved.
    /// Shapes held only in serialized form are skipped.
    pub fn move_shapes(&mut self, ids: &[ShapeId], dx: &Scalar, dy: &Scalar) -> usize {
        let mut moved = 0;
        for id in ids {
            match self.slots.get_mut(id).and_then(Slot::shape_mut) {
                Some(shape) => {
                    shape.move_by(dx, dy);
                    moved += 1;
                }
                None => warn!(%id, "move: unknown or serialized shape"),
            }
        }
        moved
    }

    /// Topmost active, renderable shape under a screen point.
    #[must_use]
    pub fn hit_test(&self, viewport: &Viewport, x: f64, y: f64) -> Option<ShapeId> {
        self.slots.iter().rev().find_map(|(id, slot)| match slot {
            Slot::Active(shape) if shape.is_renderable() && shape.intersects_with_screen(x, y, viewport) => Some(*id),
            _ => None,
        })
    }

    /// Paint active, renderable shapes bottom to top.
    pub fn render(&self, canvas: &mut S::Canvas, viewport: &Viewport) {
        for (_, shape) in self.active() {
            if shape.is_renderable() {
                shape.render(canvas, viewport);
            }
        }
    }

    // --- Visibility ---

    /// Reclassify every slot against the viewport in a single pass.
    ///
    /// A shape is kept live when its bounds overlap the viewport grown by the
    /// configured margin and its projected extent reaches the legibility
    /// threshold. Shapes are moved between states, never dropped.
    pub fn refilter(&mut self, viewport: &Viewport, config: &VisibilityConfig) -> FilterStats {
        let view_rect = viewport.world_bounds(config.margin);
        let relevant = |bounds: &WorldRect| {
            bounds.intersects(&view_rect) && viewport.world_length_to_screen(&bounds.extent()) >= config.legibility_px
        };

        let mut stats = FilterStats::default();
        let slots = std::mem::take(&mut self.slots);
        self.slots = slots
            .into_iter()
            .map(|(id, slot)| {
                let slot = match slot {
                    Slot::Active(shape) if !relevant(&shape.world_bounds()) => {
                        stats.cached += 1;
                        Slot::Cached(Cached::Live(shape))
                    }
                    Slot::Cached(Cached::Live(shape)) if relevant(&shape.world_bounds()) => {
                        stats.activated += 1;
                        Slot::Active(shape)
                    }
                    Slot::Cached(Cached::Serialized { descriptor, bounds }) if relevant(&bounds) => {
                        match S::from_descriptor(&descriptor) {
                            Some(shape) => {
                                stats.activated += 1;
                                Slot::Active(shape)
                            }
                            None => {
                                warn!(%id, "cached descriptor failed to rehydrate; leaving cached");
                                Slot::Cached(Cached::Serialized { descriptor, bounds })
                            }
                        }
                    }
                    other => other,
                };
                (id, slot)
            })
            .collect();

        debug!(activated = stats.activated, cached = stats.cached, total = self.slots.len(), "visibility pass");
        stats
    }

    /// Replace cached live shapes with their serialized descriptors.
    /// Returns how many slots were compacted.
    pub fn compact_cache(&mut self) -> usize {
        let mut compacted = 0;
        for slot in self.slots.values_mut() {
            if let Slot::Cached(Cached::Live(shape)) = slot {
                let descriptor = shape.to_descriptor();
                let bounds = shape.world_bounds();
                *slot = Slot::Cached(Cached::Serialized { descriptor, bounds });
                compacted += 1;
            }
        }
        compacted
    }
}
