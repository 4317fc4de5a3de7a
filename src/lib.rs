//! # sterad
//!
//! Monte Carlo estimation of the solid angle subtended by a circular
//! detector as seen from a coaxial circular source disc, with
//! uncertainty propagation over the source radius.
//!
//! Trials launch isotropic rays from area-uniform points on the source
//! disc and count intercepts within the detector radius; the hit
//! fraction times 2π estimates the solid angle. Uncertainty in the
//! source radius propagates by resampling the radius from a normal
//! distribution and re-running the estimator.
//!
//! ## Example
//!
//! ```rust
//! use sterad::prelude::*;
//!
//! let mut rng = McRng::new(42);
//! let omega = simulate_solid_angle(2.5, 4.0, 13.0, 10_000, &mut rng).unwrap();
//! assert!(omega > 0.0 && omega < std::f64::consts::TAU);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suspicious_operation_groupings,  // False positive for variance = E[X²] - E[X]²
    clippy::suboptimal_flops,  // Numerical code choices are intentional
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod estimator;
pub mod geometry;
pub mod propagate;
pub mod report;
pub mod rng;
pub mod sampler;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{RunConfig, RunConfigBuilder};
    pub use crate::error::{McError, McResult};
    pub use crate::estimator::{simulate_solid_angle, SolidAngleEstimator};
    pub use crate::geometry::{point_source_solid_angle, DiscGeometry};
    pub use crate::propagate::{
        propagate_uncertainty, UncertaintyPropagator, UncertaintyResult, WorkStealingPropagator,
    };
    pub use crate::report::DistanceReport;
    pub use crate::rng::McRng;
}

/// Re-export for public API
pub use error::{McError, McResult};
pub use estimator::simulate_solid_angle;
pub use geometry::point_source_solid_angle;
pub use propagate::propagate_uncertainty;
