//! End-to-end sweep over the reference measurement setup, driven
//! through the public API the way the CLI drives it.

use std::f64::consts::TAU;

use sterad::config::RunConfig;
use sterad::geometry::{point_source_solid_angle, DiscGeometry};
use sterad::propagate::{UncertaintyPropagator, WorkStealingPropagator};
use sterad::report::DistanceReport;
use sterad::rng::McRng;

/// Reduced-effort sweep over all five reference distances.
#[test]
fn test_reference_sweep() {
    let config = RunConfig::builder()
        .seed(42)
        .samples(4_000)
        .iterations(25)
        .build();

    let mut rng = McRng::new(config.reproducibility.seed);
    let propagator = UncertaintyPropagator::new(config.sampling.samples, config.sampling.iterations);

    let mut previous_mean = f64::INFINITY;
    let mut previous_theoretical = f64::INFINITY;

    for &distance in &config.distances {
        let geom = DiscGeometry::new(
            config.source.radius_mean,
            config.detector.radius,
            distance,
        )
        .unwrap();

        let result = propagator
            .propagate(&geom, config.source.radius_uncertainty, &mut rng)
            .unwrap();
        let theoretical = point_source_solid_angle(config.detector.radius, distance);

        assert!(
            result.mean > 0.0 && result.mean < TAU,
            "mean out of range at distance {distance}: {}",
            result.mean
        );
        assert!(result.std_dev >= 0.0 && result.std_dev.is_finite());
        assert_eq!(result.accepted, config.sampling.iterations);
        // 2.5 +/- 0.5 puts zero five sigma away; rejections are
        // effectively impossible at 25 draws.
        assert_eq!(result.rejected, 0);

        assert!(
            result.mean < previous_mean,
            "mean did not decrease at distance {distance}"
        );
        assert!(theoretical < previous_theoretical);
        previous_mean = result.mean;
        previous_theoretical = theoretical;

        let report = DistanceReport::new(distance, &result, theoretical);
        let rendered = report.render();
        assert!(rendered.contains("Estimated solid angle:"));
        assert!(rendered.contains("Uncertainty in solid angle:"));
        assert!(rendered.contains(&format!(
            "Theoretical solid angle for {distance} (point source):"
        )));
    }
}

/// The work-stealing path produces the same aggregate regardless of
/// worker count and stays in range on the reference setup.
#[test]
fn test_reference_sweep_parallel() {
    let geom = DiscGeometry::new(2.5, 4.0, 13.0).unwrap();

    let run = |workers| {
        let mut rng = McRng::new(42);
        WorkStealingPropagator::with_workers(2_000, 16, workers)
            .propagate(&geom, 0.5, &mut rng)
            .unwrap()
    };

    let two = run(2);
    let four = run(4);

    assert_eq!(two.mean.to_bits(), four.mean.to_bits());
    assert_eq!(two.std_dev.to_bits(), four.std_dev.to_bits());
    assert!(two.mean > 0.0 && two.mean < TAU);
    assert_eq!(two.rejected, 0);
}

/// The estimated mean at each distance tracks the point-source
/// reference: a 2.5-radius source against a 4-radius detector stays
/// within a factor of two of the analytic value.
#[test]
fn test_estimate_tracks_analytic_reference() {
    let mut rng = McRng::new(3);
    let propagator = UncertaintyPropagator::new(4_000, 20);

    for distance in [13.0, 21.0, 29.0, 37.0] {
        let geom = DiscGeometry::new(2.5, 4.0, distance).unwrap();
        let result = propagator.propagate(&geom, 0.5, &mut rng).unwrap();
        let analytic = point_source_solid_angle(4.0, distance);

        let ratio = result.mean / analytic;
        assert!(
            ratio > 0.5 && ratio < 2.0,
            "mean {} vs analytic {analytic} at distance {distance}",
            result.mean
        );
    }
}
