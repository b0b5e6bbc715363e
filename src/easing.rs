//! Easing catalog for camera animation.
//!
//! An easing maps linear progress `p` in `[0, 1]` to interpolation factors.
//! Plain easings only shape the factor. Cinematic easings layer a small
//! deterministic perturbation on top of a base curve, either on the factor
//! itself or as a screen-relative offset on the camera position.
//!
//! Every perturbation is multiplied by an envelope that is exactly zero at
//! both ends, so all easings map `0 -> 0` and `1 -> 1` exactly and the
//! offset vanishes at `p == 1`.

#[cfg(test)]
#[path = "easing_test.rs"]
mod easing_test;

use std::f64::consts::{PI, TAU};

/// Named easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Cubic ease-out, `1 - (1 - p)^3`.
    #[default]
    Default,
    Linear,
    /// `3p^2 - 2p^3`.
    SmoothStep,
    /// `6p^5 - 15p^4 + 10p^3`.
    SmootherStep,
    ElasticOut,
    ElasticIn,
    BounceOut,
    /// Smoother-step with a slow stabilizer sway.
    Steadicam,
    /// Smooth-step with layered positional shake.
    Handheld,
    /// Smoother-step with a gentle floating drift.
    Drone,
    /// Range first swings away from the target, then back onto it, while the
    /// position glides.
    DollyZoom,
    /// Position rises on an arc before settling.
    Crane,
    /// Cubic ease-out with violent, decaying shake.
    Earthquake,
    /// Smooth-step with a circular orbit around the path.
    Orbital,
    /// Weighted cubic Bezier blend.
    Bezier,
}

/// Every easing, in catalog order.
pub const ALL_EASINGS: [Easing; 15] = [
    Easing::Default,
    Easing::Linear,
    Easing::SmoothStep,
    Easing::SmootherStep,
    Easing::ElasticOut,
    Easing::ElasticIn,
    Easing::BounceOut,
    Easing::Steadicam,
    Easing::Handheld,
    Easing::Drone,
    Easing::DollyZoom,
    Easing::Crane,
    Easing::Earthquake,
    Easing::Orbital,
    Easing::Bezier,
];

/// Interpolation factors for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedFrame {
    /// Factor applied to the position interpolation.
    pub pos: f64,
    /// Factor applied to the range interpolation.
    pub range: f64,
    /// Extra offset on the position, in units of the current range.
    pub offset: (f64, f64),
}

impl Easing {
    /// Look up an easing by name. Unknown names fall back to [`Easing::Default`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "default" => Self::Default,
            "linear" => Self::Linear,
            "smoothStep" => Self::SmoothStep,
            "smootherStep" => Self::SmootherStep,
            "elasticOut" => Self::ElasticOut,
            "elasticIn" => Self::ElasticIn,
            "bounceOut" => Self::BounceOut,
            "steadicam" => Self::Steadicam,
            "handheld" => Self::Handheld,
            "drone" => Self::Drone,
            "dollyZoom" => Self::DollyZoom,
            "crane" => Self::Crane,
            "earthquake" => Self::Earthquake,
            "orbital" => Self::Orbital,
            "bezier" => Self::Bezier,
            other => {
                tracing::debug!(easing = other, "unknown easing; using default");
                Self::Default
            }
        }
    }

    /// Canonical name, the inverse of [`Easing::from_name`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Linear => "linear",
            Self::SmoothStep => "smoothStep",
            Self::SmootherStep => "smootherStep",
            Self::ElasticOut => "elasticOut",
            Self::ElasticIn => "elasticIn",
            Self::BounceOut => "bounceOut",
            Self::Steadicam => "steadicam",
            Self::Handheld => "handheld",
            Self::Drone => "drone",
            Self::DollyZoom => "dollyZoom",
            Self::Crane => "crane",
            Self::Earthquake => "earthquake",
            Self::Orbital => "orbital",
            Self::Bezier => "bezier",
        }
    }

    /// Whether the perturbation needs extra time to read on screen.
    #[must_use]
    pub fn is_complex(self) -> bool {
        matches!(self, Self::Handheld | Self::Earthquake | Self::DollyZoom | Self::Orbital)
    }

    /// Scalar interpolation factor for progress `p` (clamped to `[0, 1]`).
    #[must_use]
    pub fn apply(self, p: f64) -> f64 {
        self.frame(p).pos
    }

    /// Full set of factors for progress `p` (clamped to `[0, 1]`).
    #[must_use]
    pub fn frame(self, p: f64) -> EasedFrame {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let env = envelope(p);
        let plain = |f: f64| EasedFrame { pos: f, range: f, offset: (0.0, 0.0) };

        match self {
            Self::Default => plain(ease_out_cubic(p)),
            Self::Linear => plain(p),
            Self::SmoothStep => plain(smooth_step(p)),
            Self::SmootherStep => plain(smoother_step(p)),
            Self::ElasticOut => plain(elastic_out(p)),
            Self::ElasticIn => plain(elastic_in(p)),
            Self::BounceOut => plain(bounce_out(p)),
            Self::Bezier => plain(bezier(p)),
            Self::Steadicam => plain(smoother_step(p) + 0.03 * (TAU * p).sin() * env),
            Self::Handheld => EasedFrame {
                pos: smooth_step(p),
                range: smooth_step(p),
                offset: (
                    0.02 * env * (0.6 * (p * 47.0).sin() + 0.4 * (p * 89.0).sin()),
                    0.02 * env * (0.6 * (p * 53.0).cos() + 0.4 * (p * 97.0).cos()),
                ),
            },
            Self::Drone => EasedFrame {
                pos: smoother_step(p),
                range: smoother_step(p),
                offset: (0.04 * env * (PI * 3.0 * p).sin(), 0.03 * env * (PI * 2.0 * p).cos()),
            },
            Self::DollyZoom => EasedFrame { pos: smooth_step(p), range: smooth_step(p) - 0.25 * env, offset: (0.0, 0.0) },
            Self::Crane => {
                let f = ease_in_out_cubic(p);
                EasedFrame { pos: f, range: f, offset: (0.0, -0.15 * env) }
            }
            Self::Earthquake => {
                let decay = (1.0 - p) * env;
                EasedFrame {
                    pos: ease_out_cubic(p),
                    range: ease_out_cubic(p),
                    offset: (0.06 * decay * (p * 131.0).sin(), 0.06 * decay * (p * 149.0).cos()),
                }
            }
            Self::Orbital => {
                let angle = TAU * p;
                EasedFrame {
                    pos: smooth_step(p),
                    range: smooth_step(p),
                    offset: (0.1 * env * angle.sin(), 0.1 * env * (1.0 - angle.cos())),
                }
            }
        }
    }
}

/// `4p(1 - p)`: peaks at 1 mid-flight, exactly zero at both ends.
fn envelope(p: f64) -> f64 {
    4.0 * p * (1.0 - p)
}

fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

fn ease_in_out_cubic(p: f64) -> f64 {
    if p < 0.5 { 4.0 * p * p * p } else { 1.0 - (-2.0 * p + 2.0).powi(3) / 2.0 }
}

fn smooth_step(p: f64) -> f64 {
    p * p * (3.0 - 2.0 * p)
}

fn smoother_step(p: f64) -> f64 {
    p * p * p * (p * (p * 6.0 - 15.0) + 10.0)
}

fn elastic_out(p: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let c4 = TAU / 3.0;
    2f64.powf(-10.0 * p) * ((p * 10.0 - 0.75) * c4).sin() + 1.0
}

fn elastic_in(p: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let c4 = TAU / 3.0;
    -(2f64.powf(10.0 * p - 10.0)) * ((p * 10.0 - 10.75) * c4).sin()
}

fn bounce_out(p: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if p < 1.0 / D1 {
        N1 * p * p
    } else if p < 2.0 / D1 {
        let q = p - 1.5 / D1;
        N1 * q * q + 0.75
    } else if p < 2.5 / D1 {
        let q = p - 2.25 / D1;
        N1 * q * q + 0.9375
    } else if p < 1.0 {
        let q = p - 2.625 / D1;
        N1 * q * q + 0.984_375
    } else {
        1.0
    }
}

/// Cubic Bezier with control weights `0.1` and `1.0`, blended with
/// smooth-step for a soft start and a long settle.
fn bezier(p: f64) -> f64 {
    const W1: f64 = 0.1;
    const W2: f64 = 1.0;
    let q = 1.0 - p;
    let curve = 3.0 * q * q * p * W1 + 3.0 * q * p * p * W2 + p * p * p;
    curve + 0.3 * (smooth_step(p) - curve)
}
