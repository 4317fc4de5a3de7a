//! Single-trial sampling: one point on the source disc, one emission
//! direction, one hit test against the detector plane.
//!
//! # Sampling rules
//!
//! ```text
//! Source point:  θ_s ~ U[0, 2π),  r = R_src·√u      (area-uniform)
//! Direction:     φ ~ U[0, 2π),    θ = arccos(2u − 1) (full-sphere uniform)
//! Intersection:  t = d / dir.z,   (x_i, y_i) = source + t·(dir.x, dir.y)
//! Hit:           x_i² + y_i² ≤ R_det²
//! ```
//!
//! Backward and grazing rays (dir.z ≤ 0) go through the same arithmetic
//! as forward rays. A negative z gives a negative t whose intercept is
//! still tested against the detector bound; the near-axis backward cone
//! mirrors the forward one, doubling the raw hit fraction, which is why
//! the estimator normalizes by 2π instead of 4π. A zero z yields a
//! non-finite intercept that fails the bound check. Filtering z ≤ 0
//! draws out would break that normalization.

use std::f64::consts::PI;

use crate::geometry::{DiscGeometry, Vec3};
use crate::rng::McRng;

/// One sampled emission: source point, direction, hit outcome.
///
/// Ephemeral; the estimator reduces trials to a hit count and discards
/// them.
#[derive(Debug, Clone, Copy)]
pub struct Trial {
    /// X coordinate of the emission point on the source disc.
    pub x_source: f64,
    /// Y coordinate of the emission point on the source disc.
    pub y_source: f64,
    /// Emission direction (unit vector, either hemisphere).
    pub direction: Vec3,
    /// Whether the ray's intersection with the detector plane landed
    /// inside the detector disc.
    pub hit: bool,
}

/// Draw one point uniformly by area over a disc of the given radius.
///
/// The √u radial rule is what makes the distribution uniform in area
/// rather than in radius.
#[must_use]
pub fn sample_disc_point(radius: f64, rng: &mut McRng) -> (f64, f64) {
    let theta = 2.0 * PI * rng.gen_f64();
    let r = radius * rng.gen_f64().sqrt();
    (r * theta.cos(), r * theta.sin())
}

/// Draw one direction uniformly over the full sphere.
#[must_use]
pub fn sample_direction(rng: &mut McRng) -> Vec3 {
    let phi = 2.0 * PI * rng.gen_f64();
    let theta = (2.0 * rng.gen_f64() - 1.0).acos();
    Vec3::new(
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    )
}

/// Run one trial: sample an emission and test it against the detector.
///
/// Pure function of its random draws; no failure modes. Rays with
/// `direction.z ≤ 0` are evaluated through the same intersection
/// arithmetic as forward rays, negative t included.
#[must_use]
pub fn sample_trial(geom: &DiscGeometry, rng: &mut McRng) -> Trial {
    let (x_source, y_source) = sample_disc_point(geom.radius_source(), rng);
    let direction = sample_direction(rng);

    // Intersection with the detector plane z = distance.
    let t = geom.distance() / direction.z;
    let x_intercept = x_source + t * direction.x;
    let y_intercept = y_source + t * direction.y;

    let r_det = geom.radius_detector();
    let hit = x_intercept * x_intercept + y_intercept * y_intercept <= r_det * r_det;

    Trial {
        x_source,
        y_source,
        direction,
        hit,
    }
}
