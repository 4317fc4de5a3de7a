//! Run configuration with YAML schema and validation.
//!
//! Mistake-proofing happens in three layers: serde rejects unknown
//! fields, validator enforces schema ranges, and a semantic pass checks
//! the constraints the schema cannot express (strict positivity, finite
//! distances).

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{McError, McResult};

/// Top-level run configuration.
///
/// Defaults reproduce the reference measurement setup: a 2.5 ± 0.5 cm
/// source disc, a 4 cm detector, five separations, 10 000 trials per
/// estimate, 100 propagation iterations.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Reproducibility settings.
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Source disc parameters.
    #[validate(nested)]
    #[serde(default)]
    pub source: SourceConfig,

    /// Detector disc parameters.
    #[validate(nested)]
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Source-to-detector separations to process, in order.
    #[validate(length(min = 1))]
    #[serde(default = "default_distances")]
    pub distances: Vec<f64>,

    /// Sampling effort.
    #[validate(nested)]
    #[serde(default)]
    pub sampling: SamplingConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_distances() -> Vec<f64> {
    vec![5.0, 13.0, 21.0, 29.0, 37.0]
}

impl RunConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, YAML parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> McResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> McResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Create a builder for programmatic construction.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Constraints the schema ranges cannot express.
    fn validate_semantic(&self) -> McResult<()> {
        if self.source.radius_mean <= 0.0 || !self.source.radius_mean.is_finite() {
            return Err(McError::invalid_argument(format!(
                "source radius mean must be positive and finite, got {}",
                self.source.radius_mean
            )));
        }
        if self.source.radius_uncertainty < 0.0 || !self.source.radius_uncertainty.is_finite() {
            return Err(McError::invalid_argument(format!(
                "source radius uncertainty must be non-negative, got {}",
                self.source.radius_uncertainty
            )));
        }
        if self.detector.radius <= 0.0 || !self.detector.radius.is_finite() {
            return Err(McError::invalid_argument(format!(
                "detector radius must be positive and finite, got {}",
                self.detector.radius
            )));
        }
        for &distance in &self.distances {
            if distance <= 0.0 || !distance.is_finite() {
                return Err(McError::invalid_argument(format!(
                    "distances must be positive and finite, got {distance}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            reproducibility: ReproducibilityConfig::default(),
            source: SourceConfig::default(),
            detector: DetectorConfig::default(),
            distances: default_distances(),
            sampling: SamplingConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    seed: Option<u64>,
    source_radius: Option<(f64, f64)>,
    detector_radius: Option<f64>,
    distances: Option<Vec<f64>>,
    samples: Option<usize>,
    iterations: Option<usize>,
    parallel: Option<bool>,
}

impl RunConfigBuilder {
    /// Set the master seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the source radius mean and uncertainty.
    #[must_use]
    pub const fn source_radius(mut self, mean: f64, uncertainty: f64) -> Self {
        self.source_radius = Some((mean, uncertainty));
        self
    }

    /// Set the detector radius.
    #[must_use]
    pub const fn detector_radius(mut self, radius: f64) -> Self {
        self.detector_radius = Some(radius);
        self
    }

    /// Set the distance sequence.
    #[must_use]
    pub fn distances(mut self, distances: Vec<f64>) -> Self {
        self.distances = Some(distances);
        self
    }

    /// Set the trial count per estimate.
    #[must_use]
    pub const fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Set the propagation iteration count.
    #[must_use]
    pub const fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Enable or disable the work-stealing propagator.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RunConfig {
        let mut config = RunConfig::default();

        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }
        if let Some((mean, uncertainty)) = self.source_radius {
            config.source.radius_mean = mean;
            config.source.radius_uncertainty = uncertainty;
        }
        if let Some(radius) = self.detector_radius {
            config.detector.radius = radius;
        }
        if let Some(distances) = self.distances {
            config.distances = distances;
        }
        if let Some(samples) = self.samples {
            config.sampling.samples = samples;
        }
        if let Some(iterations) = self.iterations {
            config.sampling.iterations = iterations;
        }
        if let Some(parallel) = self.parallel {
            config.sampling.parallel = parallel;
        }

        config
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproducibilityConfig {
    /// Master seed for all randomness.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

const fn default_seed() -> u64 {
    42
}

impl Default for ReproducibilityConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Source disc parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    /// Mean source radius.
    #[serde(default = "default_source_radius_mean")]
    pub radius_mean: f64,
    /// Standard deviation of the source radius.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_source_radius_uncertainty")]
    pub radius_uncertainty: f64,
}

const fn default_source_radius_mean() -> f64 {
    2.5
}

const fn default_source_radius_uncertainty() -> f64 {
    0.5
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            radius_mean: default_source_radius_mean(),
            radius_uncertainty: default_source_radius_uncertainty(),
        }
    }
}

/// Detector disc parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DetectorConfig {
    /// Detector radius.
    #[serde(default = "default_detector_radius")]
    pub radius: f64,
}

const fn default_detector_radius() -> f64 {
    4.0
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            radius: default_detector_radius(),
        }
    }
}

/// Sampling effort configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SamplingConfig {
    /// Trials per solid-angle estimate.
    #[validate(range(min = 1))]
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Radius perturbations per distance.
    #[validate(range(min = 1))]
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Run iterations on the work-stealing pool instead of serially.
    #[serde(default)]
    pub parallel: bool,
}

const fn default_samples() -> usize {
    10_000
}

const fn default_iterations() -> usize {
    100
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            iterations: default_iterations(),
            parallel: false,
        }
    }
}
