//! Shared numeric constants for the navigation engine.

// ── Precision ───────────────────────────────────────────────────

/// Significant decimal digits kept by every world-space scalar operation.
///
/// Must cover the ratio between the largest world coordinate reachable at
/// `MAX_RANGE` and a sub-pixel step at `MIN_RANGE`.
pub const PRECISION_DIGITS: u64 = 256;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest world-space viewport height (deepest zoom).
pub const MIN_RANGE: &str = "1e-100";

/// Largest world-space viewport height (widest zoom).
pub const MAX_RANGE: &str = "1e100";

/// Viewport height the camera starts with and falls back to.
pub const DEFAULT_RANGE: &str = "1";

// ── Visibility ──────────────────────────────────────────────────

/// Pan distance, as a fraction of the current range, that forces a refilter.
pub const REFILTER_PAN_FRACTION: f64 = 0.1;

/// Change in `log10(range)` that forces a refilter (about 26% zoom).
pub const REFILTER_LOG_ZOOM_DELTA: f64 = 0.1;

/// Extra margin around the viewport, in viewport sizes per side.
pub const VISIBILITY_MARGIN: f64 = 0.5;

/// Shapes whose projected extent is below this many pixels are cached out.
pub const LEGIBILITY_THRESHOLD_PX: f64 = 0.5;

// ── Animation ───────────────────────────────────────────────────

/// Base duration for direct navigation, in milliseconds.
pub const BASE_DURATION_MS: f64 = 500.0;

/// Upper bound for heuristic navigation durations, in milliseconds.
pub const MAX_DURATION_MS: f64 = 3000.0;

/// Duration of a non-final waypoint leg, in milliseconds.
pub const WAYPOINT_LEG_MS: f64 = 300.0;

/// Duration of the final waypoint leg, in milliseconds.
pub const WAYPOINT_FINAL_LEG_MS: f64 = 600.0;

/// Leg duration multiplier for easings with visible perturbations.
pub const COMPLEX_EASING_MULTIPLIER: f64 = 1.5;

// ── Tour ────────────────────────────────────────────────────────

/// Default autoplay interval between bookmarks, in milliseconds.
pub const TOUR_INTERVAL_MS: f64 = 3000.0;

// ── Input ───────────────────────────────────────────────────────

/// Range multiplier for one wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
