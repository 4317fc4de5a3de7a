//! Per-distance result reporting.
//!
//! The CLI and the integration tests share this rendering so the
//! 6-decimal output format is checked in one place.

use serde::{Deserialize, Serialize};

use crate::error::McError;
use crate::propagate::UncertaintyResult;

/// Final output for one configured distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceReport {
    /// Source-to-detector separation.
    pub distance: f64,
    /// Mean of the propagated solid-angle distribution.
    pub mean: f64,
    /// Population standard deviation of that distribution.
    pub std_dev: f64,
    /// Analytic point-source reference value.
    pub theoretical: f64,
}

impl DistanceReport {
    /// Assemble a report from a propagation result and the analytic
    /// reference.
    #[must_use]
    pub const fn new(distance: f64, result: &UncertaintyResult, theoretical: f64) -> Self {
        Self {
            distance,
            mean: result.mean,
            std_dev: result.std_dev,
            theoretical,
        }
    }

    /// Human-readable rendering, 6 decimal places throughout.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Estimated solid angle: {:.6} steradians\n\
             Uncertainty in solid angle: {:.6} steradians\n\
             Theoretical solid angle for {} (point source): {:.6} steradians\n",
            self.mean, self.std_dev, self.distance, self.theoretical
        )
    }
}

/// Print one distance report to stdout.
pub fn print_report(report: &DistanceReport) {
    println!("{}", report.render());
}

/// Print a per-distance failure diagnostic to stderr, naming the failing
/// distance and parameters; the run then continues with the next
/// distance.
pub fn print_failure(distance: f64, radius_mean: f64, radius_uncertainty: f64, err: &McError) {
    eprintln!(
        "distance {distance}: propagation failed for source radius \
         {radius_mean} ± {radius_uncertainty}: {err}"
    );
}

/// Print the run header.
pub fn print_run_header(seed: u64, samples: usize, iterations: usize, parallel: bool) {
    let mode = if parallel { "work-stealing" } else { "serial" };
    println!(
        "sterad v{}: seed {seed}, {samples} samples x {iterations} iterations ({mode})\n",
        env!("CARGO_PKG_VERSION")
    );
}
