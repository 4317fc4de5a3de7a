//! Solid-angle estimation by trial counting.
//!
//! Runs a fixed number of independent trials through the sampler and
//! converts the hit fraction to steradians with the 2π normalization:
//!
//! ```text
//! Ω̂ = (hits / num_samples) · 2π
//! ```
//!
//! Directions are drawn from the full sphere (4π), but negative-t
//! backward intersections counted by the raw hit test mirror the forward
//! ones, so the hit fraction is twice the forward-cone fraction and 2π is
//! the factor that makes Ω̂ estimate the subtended solid angle. The
//! formula is preserved exactly; deriving a different normalization would
//! diverge from reference output.

use std::f64::consts::PI;

use crate::error::{McError, McResult};
use crate::geometry::DiscGeometry;
use crate::rng::McRng;
use crate::sampler::sample_trial;

/// Monte Carlo estimator with a fixed trial count.
///
/// Stateless between calls; all randomness comes from the generator the
/// caller passes in.
#[derive(Debug, Clone, Copy)]
pub struct SolidAngleEstimator {
    /// Number of trials per estimate.
    num_samples: usize,
}

impl SolidAngleEstimator {
    /// Create an estimator with the given trial count.
    #[must_use]
    pub const fn new(num_samples: usize) -> Self {
        Self { num_samples }
    }

    /// Configured trial count.
    #[must_use]
    pub const fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Produce one solid-angle estimate in [0, 2π].
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidArgument` if the trial count is zero
    /// (the hit fraction would divide by zero).
    pub fn estimate(&self, geom: &DiscGeometry, rng: &mut McRng) -> McResult<f64> {
        if self.num_samples == 0 {
            return Err(McError::invalid_argument(
                "num_samples must be positive, got 0",
            ));
        }

        let mut hits: usize = 0;
        for _ in 0..self.num_samples {
            if sample_trial(geom, rng).hit {
                hits += 1;
            }
        }

        Ok(hits as f64 / self.num_samples as f64 * 2.0 * PI)
    }
}

/// Estimate the solid angle for one geometry; convenience wrapper over
/// [`SolidAngleEstimator`].
///
/// # Errors
///
/// Returns `McError::InvalidArgument` for non-positive geometry
/// parameters or a zero trial count.
pub fn simulate_solid_angle(
    radius_source: f64,
    radius_detector: f64,
    distance: f64,
    num_samples: usize,
    rng: &mut McRng,
) -> McResult<f64> {
    let geom = DiscGeometry::new(radius_source, radius_detector, distance)?;
    SolidAngleEstimator::new(num_samples).estimate(&geom, rng)
}
