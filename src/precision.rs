//! Arbitrary-precision world-space numbers.
//!
//! Every camera and world coordinate is a [`Scalar`], a decimal with
//! [`PRECISION_DIGITS`](crate::consts::PRECISION_DIGITS) significant digits.
//! Ordinary `f64` is only produced at the screen boundary (see
//! [`crate::camera::Viewport`]), so shapes stay put no matter how far the
//! range drifts from 1.
//!
//! Values are string-encoded when serialized so they survive a JSON round
//! trip without losing digits.

#[cfg(test)]
#[path = "precision_test.rs"]
mod precision_test;

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::consts::PRECISION_DIGITS;
use crate::error::ScalarParseError;

/// Arbitrary-precision scalar used for all world-space arithmetic.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Scalar(BigDecimal);

impl Scalar {
    /// Zero.
    #[must_use]
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    /// One.
    #[must_use]
    pub fn one() -> Self {
        Self(BigDecimal::from(1))
    }

    /// Parse a decimal string such as `"0.25"` or `"1e-80"`.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarParseError`] when the text is not a decimal number.
    pub fn parse(text: &str) -> Result<Self, ScalarParseError> {
        let value = BigDecimal::from_str(text.trim()).map_err(|source| ScalarParseError {
            text: text.to_owned(),
            source,
        })?;
        Ok(Self::round(value))
    }

    /// Convert from `f64` through its shortest decimal representation, so
    /// `0.1` becomes exactly `0.1`. Returns `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        match BigDecimal::from_str(&value.to_string()) {
            Ok(v) => Some(Self::round(v)),
            Err(error) => {
                warn!(value, %error, "f64 has no decimal form");
                None
            }
        }
    }

    /// Like [`Scalar::from_f64`], with non-finite input mapped to zero.
    #[must_use]
    pub fn from_f64_lossy(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_default()
    }

    /// Nearest `f64`. Values too large for `f64` saturate to a signed
    /// infinity and values too small flush to zero.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        if let Some(value) = self.0.to_f64() {
            return value;
        }
        let huge = self.0.abs() > BigDecimal::from(1);
        match (huge, self.is_positive()) {
            (true, true) => f64::INFINITY,
            (true, false) => f64::NEG_INFINITY,
            (false, _) => 0.0,
        }
    }

    /// `10^exponent` for any finite exponent, including ones far outside the
    /// `f64` range. `None` for NaN and infinities.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pow10(exponent: f64) -> Option<Self> {
        if !exponent.is_finite() {
            return None;
        }
        let whole = exponent.floor();
        let mantissa = Self::from_f64(10f64.powf(exponent - whole))?;
        let decade = BigDecimal::new(BigInt::from(1), -(whole.clamp(-1e15, 1e15) as i64));
        Some(Self::round(mantissa.0 * decade))
    }

    /// Approximate base-10 logarithm, computed from the decimal exponent so
    /// it stays accurate far outside the `f64` range. `None` unless positive.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn log10(&self) -> Option<f64> {
        if !self.is_positive() {
            return None;
        }
        let (mantissa, scale) = self.0.with_prec(17).as_bigint_and_exponent();
        let mantissa = mantissa.to_f64()?;
        Some(mantissa.log10() - scale as f64)
    }

    /// Square root; zero for negative input.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        self.0.sqrt().map_or_else(Self::zero, Self::round)
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > BigDecimal::zero()
    }

    /// Multiply by an `f64` factor, converting the factor exactly once.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        self * &Self::from_f64_lossy(factor)
    }

    /// Linear interpolation `self + (to - self) * t`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        self + &(to - self).scale(t)
    }

    fn round(value: BigDecimal) -> Self {
        Self(value.with_prec(PRECISION_DIGITS).normalized())
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({})", self.0)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Scalar {
    type Err = ScalarParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, rhs: &Scalar) -> Scalar {
        Scalar::round(&self.0 + &rhs.0)
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, rhs: &Scalar) -> Scalar {
        Scalar::round(&self.0 - &rhs.0)
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &Scalar) -> Scalar {
        Scalar::round(&self.0 * &rhs.0)
    }
}

/// Division by zero yields zero rather than panicking.
impl Div<&Scalar> for &Scalar {
    type Output = Scalar;

    fn div(self, rhs: &Scalar) -> Scalar {
        if rhs.0.is_zero() {
            return Scalar::zero();
        }
        Scalar::round(&self.0 / &rhs.0)
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar(-self.0.clone())
    }
}

impl Add for Scalar {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl Sub for Scalar {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl Mul for Scalar {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl Div for Scalar {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        &self / &rhs
    }
}

/// A point or offset in world space.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: Scalar,
    pub y: Scalar,
}

impl Vector2 {
    #[must_use]
    pub fn new(x: Scalar, y: Scalar) -> Self {
        Self { x, y }
    }

    /// Build from `f64` components (non-finite components become zero).
    #[must_use]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self { x: Scalar::from_f64_lossy(x), y: Scalar::from_f64_lossy(y) }
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Squared length. Compare against squared thresholds to skip the square root.
    #[must_use]
    pub fn magnitude_squared(&self) -> Scalar {
        &(&self.x * &self.x) + &(&self.y * &self.y)
    }

    #[must_use]
    pub fn magnitude(&self) -> Scalar {
        self.magnitude_squared().sqrt()
    }

    /// Component-wise linear interpolation.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self { x: self.x.lerp(&to.x, t), y: self.y.lerp(&to.y, t) }
    }
}

impl Add<&Vector2> for &Vector2 {
    type Output = Vector2;

    fn add(self, rhs: &Vector2) -> Vector2 {
        Vector2 { x: &self.x + &rhs.x, y: &self.y + &rhs.y }
    }
}

impl Sub<&Vector2> for &Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: &Vector2) -> Vector2 {
        Vector2 { x: &self.x - &rhs.x, y: &self.y - &rhs.y }
    }
}

impl Mul<&Scalar> for &Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: &Scalar) -> Vector2 {
        Vector2 { x: &self.x * rhs, y: &self.y * rhs }
    }
}

impl Div<&Scalar> for &Vector2 {
    type Output = Vector2;

    fn div(self, rhs: &Scalar) -> Vector2 {
        Vector2 { x: &self.x / rhs, y: &self.y / rhs }
    }
}
