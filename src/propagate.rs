//! Propagation of source-radius uncertainty to solid-angle uncertainty.
//!
//! The source radius is resampled from N(mean, sigma) once per
//! iteration; non-positive draws are rejected outright (skipped, never
//! replaced), so the realized sample count can be smaller than the
//! iteration count. The surviving estimates are reduced to a mean and a
//! population standard deviation and then discarded.

use serde::{Deserialize, Serialize};

use crate::error::{McError, McResult};
use crate::estimator::SolidAngleEstimator;
use crate::geometry::DiscGeometry;
use crate::rng::McRng;

/// Aggregate of one propagation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncertaintyResult {
    /// Arithmetic mean of the accepted solid-angle estimates.
    pub mean: f64,
    /// Population standard deviation (divisor is the accepted count,
    /// not the accepted count minus one).
    pub std_dev: f64,
    /// Number of radius draws that survived the positivity check.
    pub accepted: usize,
    /// Number of radius draws rejected as non-positive.
    pub rejected: usize,
}

impl UncertaintyResult {
    /// Reduce a set of estimates to (mean, population std).
    ///
    /// # Errors
    ///
    /// Returns `McError::EmptySample` if `samples` is empty, and
    /// `McError::NonFiniteValue` if the reduction produces a non-finite
    /// aggregate.
    pub fn from_samples(samples: &[f64], rejected: usize) -> McResult<Self> {
        if samples.is_empty() {
            return Err(McError::EmptySample {
                attempts: rejected,
                rejected,
            });
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        if !mean.is_finite() || !std_dev.is_finite() {
            return Err(McError::non_finite("propagation aggregate"));
        }

        Ok(Self {
            mean,
            std_dev,
            accepted: samples.len(),
            rejected,
        })
    }

    /// Relative uncertainty `std_dev / |mean|` (falls back to the
    /// absolute std when the mean vanishes).
    #[must_use]
    pub fn relative_uncertainty(&self) -> f64 {
        if self.mean.abs() < f64::EPSILON {
            self.std_dev
        } else {
            self.std_dev / self.mean.abs()
        }
    }
}

/// Serial uncertainty propagator.
#[derive(Debug, Clone, Copy)]
pub struct UncertaintyPropagator {
    estimator: SolidAngleEstimator,
    num_iterations: usize,
}

impl UncertaintyPropagator {
    /// Create a propagator with per-estimate trial count and iteration
    /// count.
    #[must_use]
    pub const fn new(num_samples: usize, num_iterations: usize) -> Self {
        Self {
            estimator: SolidAngleEstimator::new(num_samples),
            num_iterations,
        }
    }

    /// Configured iteration count.
    #[must_use]
    pub const fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Run the propagation for one distance.
    ///
    /// `geom.radius_source()` is taken as the mean of the radius
    /// distribution; `radius_uncertainty` is its standard deviation.
    ///
    /// # Errors
    ///
    /// - `McError::InvalidArgument` for a zero iteration count, a zero
    ///   trial count, or a negative/non-finite uncertainty.
    /// - `McError::EmptySample` if every radius draw was rejected.
    pub fn propagate(
        &self,
        geom: &DiscGeometry,
        radius_uncertainty: f64,
        rng: &mut McRng,
    ) -> McResult<UncertaintyResult> {
        self.validate(radius_uncertainty)?;

        let mut solid_angles = Vec::with_capacity(self.num_iterations);
        let mut rejected = 0usize;

        for _ in 0..self.num_iterations {
            let radius = rng.gen_normal(geom.radius_source(), radius_uncertainty);
            if radius <= 0.0 {
                // Skipped, not replaced: the realized sample count shrinks.
                rejected += 1;
                continue;
            }
            let perturbed = geom.with_source_radius(radius)?;
            solid_angles.push(self.estimator.estimate(&perturbed, rng)?);
        }

        UncertaintyResult::from_samples(&solid_angles, rejected)
    }

    fn validate(&self, radius_uncertainty: f64) -> McResult<()> {
        if self.num_iterations == 0 {
            return Err(McError::invalid_argument(
                "num_iterations must be positive, got 0",
            ));
        }
        if self.estimator.num_samples() == 0 {
            return Err(McError::invalid_argument(
                "num_samples must be positive, got 0",
            ));
        }
        if !radius_uncertainty.is_finite() || radius_uncertainty < 0.0 {
            return Err(McError::invalid_argument(format!(
                "radius uncertainty must be finite and non-negative, got {radius_uncertainty}"
            )));
        }
        Ok(())
    }
}

/// Propagate source-radius uncertainty for one geometry; convenience
/// wrapper returning the (mean, std) pair.
///
/// # Errors
///
/// See [`UncertaintyPropagator::propagate`].
pub fn propagate_uncertainty(
    radius_source_mean: f64,
    radius_source_uncertainty: f64,
    radius_detector: f64,
    distance: f64,
    num_samples: usize,
    num_iterations: usize,
    rng: &mut McRng,
) -> McResult<(f64, f64)> {
    let geom = DiscGeometry::new(radius_source_mean, radius_detector, distance)?;
    let result = UncertaintyPropagator::new(num_samples, num_iterations)
        .propagate(&geom, radius_source_uncertainty, rng)?;
    Ok((result.mean, result.std_dev))
}

// =============================================================================
// Work-stealing parallel propagation
// =============================================================================

/// One propagation iteration packaged as a stealable task.
///
/// Each task carries its own partitioned RNG stream, so results are
/// independent of scheduling order and worker count.
#[derive(Debug)]
struct PropagationTask {
    stream: McRng,
    index: usize,
}

/// Work-stealing parallel propagator.
///
/// Iterations are independent, so they are distributed over a
/// crossbeam-deque worker pool; idle workers steal from busy ones. The
/// result is reindexed before reduction, making the aggregate a pure
/// function of the master seed, identical across worker counts.
#[derive(Debug)]
pub struct WorkStealingPropagator {
    propagator: UncertaintyPropagator,
    num_workers: usize,
}

impl WorkStealingPropagator {
    /// Create with default worker count (number of CPUs).
    #[must_use]
    pub fn new(num_samples: usize, num_iterations: usize) -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(4);
        Self::with_workers(num_samples, num_iterations, workers)
    }

    /// Create with an explicit worker count.
    #[must_use]
    pub const fn with_workers(
        num_samples: usize,
        num_iterations: usize,
        num_workers: usize,
    ) -> Self {
        Self {
            propagator: UncertaintyPropagator::new(num_samples, num_iterations),
            num_workers,
        }
    }

    /// Worker count.
    #[must_use]
    pub const fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Parallel counterpart of [`UncertaintyPropagator::propagate`].
    ///
    /// Statistically equivalent to the serial path: every iteration
    /// draws from its own independent stream and the hit counter is
    /// reduced per task, never shared.
    ///
    /// # Errors
    ///
    /// Same conditions as the serial propagator.
    pub fn propagate(
        &self,
        geom: &DiscGeometry,
        radius_uncertainty: f64,
        rng: &mut McRng,
    ) -> McResult<UncertaintyResult> {
        self.propagator.validate(radius_uncertainty)?;

        let iterations = self.propagator.num_iterations();
        let streams = rng.partition(iterations);
        let outcomes = self.execute(geom, radius_uncertainty, streams)?;

        let mut indexed: Vec<(usize, Option<f64>)> = outcomes;
        indexed.sort_by_key(|(idx, _)| *idx);

        let mut solid_angles = Vec::with_capacity(iterations);
        let mut rejected = 0usize;
        for (_, outcome) in indexed {
            match outcome {
                Some(omega) => solid_angles.push(omega),
                None => rejected += 1,
            }
        }

        UncertaintyResult::from_samples(&solid_angles, rejected)
    }

    /// Distribute iterations over the worker pool.
    fn execute(
        &self,
        geom: &DiscGeometry,
        radius_uncertainty: f64,
        streams: Vec<McRng>,
    ) -> McResult<Vec<(usize, Option<f64>)>> {
        use crossbeam_deque::{Injector, Stealer, Worker};

        let injector: Injector<PropagationTask> = Injector::new();
        for (index, stream) in streams.into_iter().enumerate() {
            injector.push(PropagationTask { stream, index });
        }

        let workers: Vec<Worker<PropagationTask>> = (0..self.num_workers)
            .map(|_| Worker::new_fifo())
            .collect();
        let stealers: Vec<Stealer<PropagationTask>> =
            workers.iter().map(Worker::stealer).collect();

        let estimator = SolidAngleEstimator::new(self.propagator.estimator.num_samples());
        let results: std::sync::Mutex<Vec<(usize, McResult<Option<f64>>)>> =
            std::sync::Mutex::new(Vec::new());

        std::thread::scope(|s| {
            for (worker_id, worker) in workers.into_iter().enumerate() {
                let injector = &injector;
                let stealers = &stealers;
                let results = &results;

                s.spawn(move || loop {
                    let task = worker
                        .pop()
                        .or_else(|| steal_from(injector))
                        .or_else(|| steal_round_robin(stealers, worker_id));

                    let Some(mut task) = task else { break };

                    let radius = task
                        .stream
                        .gen_normal(geom.radius_source(), radius_uncertainty);
                    let outcome = if radius <= 0.0 {
                        Ok(None)
                    } else {
                        geom.with_source_radius(radius)
                            .and_then(|g| estimator.estimate(&g, &mut task.stream))
                            .map(Some)
                    };

                    if let Ok(mut guard) = results.lock() {
                        guard.push((task.index, outcome));
                    }
                });
            }
        });

        let collected = results.into_inner().unwrap_or_default();
        collected
            .into_iter()
            .map(|(idx, outcome)| outcome.map(|o| (idx, o)))
            .collect()
    }
}

fn steal_from<T>(injector: &crossbeam_deque::Injector<T>) -> Option<T> {
    loop {
        match injector.steal() {
            crossbeam_deque::Steal::Success(task) => return Some(task),
            crossbeam_deque::Steal::Empty => return None,
            crossbeam_deque::Steal::Retry => {}
        }
    }
}

fn steal_round_robin<T>(stealers: &[crossbeam_deque::Stealer<T>], worker_id: usize) -> Option<T> {
    for i in 0..stealers.len() {
        let idx = (worker_id + i + 1) % stealers.len();
        loop {
            match stealers[idx].steal() {
                crossbeam_deque::Steal::Success(task) => return Some(task),
                crossbeam_deque::Steal::Empty => break,
                crossbeam_deque::Steal::Retry => {}
            }
        }
    }
    None
}
