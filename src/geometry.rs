//! Coaxial disc geometry and the analytic point-source reference.
//!
//! The setup is a circular source disc in the z = 0 plane and a circular
//! detector disc in the z = `distance` plane, sharing the symmetry axis.

use serde::{Deserialize, Serialize};

use crate::error::{McError, McResult};

/// 3D vector used for emission directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Magnitude squared.
    #[must_use]
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length).
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Check if all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Validated geometry parameters for one estimation call.
///
/// Construction rejects non-positive or non-finite values, so every
/// instance that reaches the sampler is usable. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscGeometry {
    radius_source: f64,
    radius_detector: f64,
    distance: f64,
}

impl DiscGeometry {
    /// Create a validated geometry.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidArgument` if any parameter is
    /// non-positive or non-finite.
    pub fn new(radius_source: f64, radius_detector: f64, distance: f64) -> McResult<Self> {
        check_positive("radius_source", radius_source)?;
        check_positive("radius_detector", radius_detector)?;
        check_positive("distance", distance)?;

        Ok(Self {
            radius_source,
            radius_detector,
            distance,
        })
    }

    /// Same detector and separation, different source radius.
    ///
    /// Used by the uncertainty propagator, which re-runs the estimator
    /// once per perturbed source radius.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidArgument` if the new radius is
    /// non-positive or non-finite.
    pub fn with_source_radius(&self, radius_source: f64) -> McResult<Self> {
        Self::new(radius_source, self.radius_detector, self.distance)
    }

    /// Source disc radius.
    #[must_use]
    pub const fn radius_source(&self) -> f64 {
        self.radius_source
    }

    /// Detector disc radius.
    #[must_use]
    pub const fn radius_detector(&self) -> f64 {
        self.radius_detector
    }

    /// Source-to-detector separation along the symmetry axis.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }
}

fn check_positive(name: &str, value: f64) -> McResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(McError::invalid_argument(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(())
}

/// Exact solid angle of a flat disc detector seen from an on-axis point
/// source: `2π·(1 − d/√(d² + r²))`.
///
/// Pure reference value for validating the Monte Carlo mean in the
/// point-source limit; never fed back into the estimation.
#[must_use]
pub fn point_source_solid_angle(radius_detector: f64, distance: f64) -> f64 {
    let hypot = distance.hypot(radius_detector);
    2.0 * std::f64::consts::PI * (1.0 - distance / hypot)
}
