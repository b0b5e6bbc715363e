//! Engine configuration with optional environment overrides.
//!
//! Every tunable the navigation core needs is a named field here rather than
//! a free-form setting path. Defaults live in [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;

use tracing::warn;

use crate::consts;
use crate::easing::Easing;
use crate::error::ConfigError;
use crate::precision::Scalar;

/// Zoom bounds for the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConfig {
    /// Smallest allowed range (deepest zoom).
    pub min_range: Scalar,
    /// Largest allowed range.
    pub max_range: Scalar,
    /// Range used for a fresh camera and for snapshot fallback.
    pub default_range: Scalar,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_range: const_scalar(consts::MIN_RANGE),
            max_range: const_scalar(consts::MAX_RANGE),
            default_range: const_scalar(consts::DEFAULT_RANGE),
        }
    }
}

impl CameraConfig {
    /// Clamp a requested range into `[min_range, max_range]`.
    #[must_use]
    pub fn clamp_range(&self, range: &Scalar) -> Scalar {
        range.clone().clamp(self.min_range.clone(), self.max_range.clone())
    }
}

/// Hysteresis thresholds and inclusion test parameters for visibility culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityConfig {
    pub pan_fraction: f64,
    pub log_zoom_delta: f64,
    /// Margin around the viewport, in viewport sizes per side.
    pub margin: f64,
    pub legibility_px: f64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            pan_fraction: consts::REFILTER_PAN_FRACTION,
            log_zoom_delta: consts::REFILTER_LOG_ZOOM_DELTA,
            margin: consts::VISIBILITY_MARGIN,
            legibility_px: consts::LEGIBILITY_THRESHOLD_PX,
        }
    }
}

/// Durations used by the animation engine, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub base_duration_ms: f64,
    pub max_duration_ms: f64,
    pub leg_ms: f64,
    pub final_leg_ms: f64,
    pub complex_multiplier: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            base_duration_ms: consts::BASE_DURATION_MS,
            max_duration_ms: consts::MAX_DURATION_MS,
            leg_ms: consts::WAYPOINT_LEG_MS,
            final_leg_ms: consts::WAYPOINT_FINAL_LEG_MS,
            complex_multiplier: consts::COMPLEX_EASING_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourConfig {
    pub interval_ms: f64,
    pub easing: Easing,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self { interval_ms: consts::TOUR_INTERVAL_MS, easing: Easing::Default }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub camera: CameraConfig,
    pub visibility: VisibilityConfig,
    pub animation: AnimationConfig,
    pub tour: TourConfig,
}

impl EngineConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `DEEPZOOM_MIN_RANGE` / `DEEPZOOM_MAX_RANGE`: decimal strings
    /// - `DEEPZOOM_DEFAULT_RANGE`: decimal string
    /// - `DEEPZOOM_REFILTER_PAN_FRACTION`: default 0.1
    /// - `DEEPZOOM_REFILTER_LOG_ZOOM_DELTA`: default 0.1
    /// - `DEEPZOOM_BASE_DURATION_MS`: default 500
    /// - `DEEPZOOM_MAX_DURATION_MS`: default 3000
    /// - `DEEPZOOM_TOUR_INTERVAL_MS`: default 3000
    /// - `DEEPZOOM_TOUR_EASING`: easing name, default `default`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but unparseable, or when
    /// the range bounds are not `0 < min < max`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    /// Same as [`EngineConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let camera = CameraConfig {
            min_range: lookup_scalar(&lookup, "DEEPZOOM_MIN_RANGE", defaults.camera.min_range)?,
            max_range: lookup_scalar(&lookup, "DEEPZOOM_MAX_RANGE", defaults.camera.max_range)?,
            default_range: lookup_scalar(&lookup, "DEEPZOOM_DEFAULT_RANGE", defaults.camera.default_range)?,
        };
        if !camera.min_range.is_positive() || camera.min_range >= camera.max_range {
            return Err(ConfigError::InvalidRangeBounds {
                min: camera.min_range.to_string(),
                max: camera.max_range.to_string(),
            });
        }
        let camera = CameraConfig { default_range: camera.clamp_range(&camera.default_range), ..camera };

        let visibility = VisibilityConfig {
            pan_fraction: lookup_f64(&lookup, "DEEPZOOM_REFILTER_PAN_FRACTION", defaults.visibility.pan_fraction)?,
            log_zoom_delta: lookup_f64(&lookup, "DEEPZOOM_REFILTER_LOG_ZOOM_DELTA", defaults.visibility.log_zoom_delta)?,
            ..defaults.visibility
        };

        let animation = AnimationConfig {
            base_duration_ms: lookup_f64(&lookup, "DEEPZOOM_BASE_DURATION_MS", defaults.animation.base_duration_ms)?,
            max_duration_ms: lookup_f64(&lookup, "DEEPZOOM_MAX_DURATION_MS", defaults.animation.max_duration_ms)?,
            ..defaults.animation
        };

        let tour = TourConfig {
            interval_ms: lookup_f64(&lookup, "DEEPZOOM_TOUR_INTERVAL_MS", defaults.tour.interval_ms)?,
            easing: lookup("DEEPZOOM_TOUR_EASING").map_or(defaults.tour.easing, |name| Easing::from_name(&name)),
        };

        Ok(Self { camera, visibility, animation, tour })
    }
}

fn const_scalar(text: &str) -> Scalar {
    Scalar::parse(text).unwrap_or_else(|_| Scalar::one())
}

fn lookup_scalar(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Scalar,
) -> Result<Scalar, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => Scalar::parse(&raw).map_err(|_| ConfigError::InvalidValue { var: key.to_owned(), value: raw }),
    }
}

fn lookup_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidValue { var: key.to_owned(), value: raw }),
    }
}

/// Read an environment variable. A value that is not valid unicode is logged
/// and treated as unset.
fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            warn!(key, value = ?raw, "ignoring non-unicode environment variable");
            None
        }
    }
}
