//! Fluent builder for constructing a [`CrossingEngine`].

use lx_core::EngineConfig;
use lx_track::ArrivalEstimator;

use crate::{CrossingEngine, EngineResult};

/// Fluent builder for [`CrossingEngine`].
///
/// # Required inputs
///
/// - [`EngineConfig`] — tick length, thresholds, fuel model, metrics tuning,
///   and every crossing's geometry.  Validated in [`build`][Self::build];
///   malformed configuration is the one fatal condition in the system.
///
/// # Optional inputs
///
/// | Method         | Default                                            |
/// |----------------|----------------------------------------------------|
/// | `.baseline(b)` | No baseline; the prediction report skips comparison |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(config)
///     .baseline(Box::new(LastSpeedEstimator))
///     .build()?;
/// engine.step(&snapshot, &mut NoopObserver);
/// ```
pub struct EngineBuilder {
    config:   EngineConfig,
    baseline: Option<Box<dyn ArrivalEstimator>>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            baseline: None,
        }
    }

    /// Supply a reference predictor to score the built-in estimator against.
    ///
    /// It is invoked once per train, at the moment the one-shot estimate
    /// commits, on the same sensor triggers.  Its predictions only feed the
    /// final report's comparison; they never drive the gates.
    pub fn baseline(mut self, estimator: Box<dyn ArrivalEstimator>) -> Self {
        self.baseline = Some(estimator);
        self
    }

    /// Validate the configuration and return a ready-to-step engine.
    pub fn build(self) -> EngineResult<CrossingEngine> {
        self.config.validate()?;
        Ok(CrossingEngine::from_parts(self.config, self.baseline))
    }
}
