//! `lx-metrics` — the metrics aggregator.
//!
//! Accumulates per-vehicle wait/fuel/emissions/engine-off time every tick,
//! samples queue length and a bounded comfort score periodically, and
//! finalizes summary statistics (means, standard deviations, Student-t 95 %
//! confidence intervals) at run end.  Also scores the arrival predictor
//! against an optional physics-only baseline.
//!
//! The same [`SampleStats`] aggregation serves k-fold model comparison: feed
//! it the fold-level MAE values via [`stats::fold_mae_stats`].

pub mod comfort;
pub mod report;
pub mod stats;
pub mod tracker;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use comfort::comfort_score;
pub use report::{MetricsReport, QueueStats};
pub use stats::{
    compare_predictions, fold_mae_stats, t_critical_95, PredictionReport, PredictionSample,
    SampleStats,
};
pub use tracker::{MetricsTracker, QueueSample, WaitEvent};
pub use vehicle::VehicleRecord;
