//! Summary statistics: mean, standard deviation, Student-t confidence
//! intervals, and prediction-error comparison.
//!
//! The t-table is data in code rather than a stats-crate dependency: only the
//! two-sided 95 % column is ever needed, and keeping it local makes the
//! `n = 1` and constant-sample edge cases (margin 0, not an error) explicit.

/// Two-sided 95 % critical values of the t-distribution, df 1..=30.
const T_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228,
    2.201, 2.179, 2.160, 2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086,
    2.080, 2.074, 2.069, 2.064, 2.060, 2.056, 2.052, 2.048, 2.045, 2.042,
];

/// Two-sided 95 % Student-t critical value for `df` degrees of freedom.
///
/// Exact for df ≤ 30, then steps through the conventional 40/60/120 rows
/// before settling on the asymptotic normal value 1.960.  `df = 0` returns
/// 0.0 so a single-sample margin is defined as zero rather than panicking.
pub fn t_critical_95(df: usize) -> f64 {
    match df {
        0 => 0.0,
        1..=30 => T_95[df - 1],
        31..=40 => 2.021,
        41..=60 => 2.000,
        61..=120 => 1.980,
        _ => 1.960,
    }
}

// ── SampleStats ───────────────────────────────────────────────────────────────

/// Mean, sample standard deviation, and 95 % confidence-interval margin for
/// one scalar metric.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleStats {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Half-width of the two-sided 95 % CI: `t · s / √n`.  Zero for `n ≤ 1`
    /// and for constant-valued samples.
    pub ci95_margin: f64,
}

impl SampleStats {
    /// Aggregate a sample set.  Empty input yields all-zero stats.
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self::default();
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        if n == 1 {
            return Self {
                n,
                mean,
                std_dev: 0.0,
                ci95_margin: 0.0,
            };
        }
        let sum_sq: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
        let std_dev = (sum_sq / (n - 1) as f64).sqrt();
        let ci95_margin = t_critical_95(n - 1) * std_dev / (n as f64).sqrt();
        Self {
            n,
            mean,
            std_dev,
            ci95_margin,
        }
    }

    #[inline]
    pub fn ci_low(&self) -> f64 {
        self.mean - self.ci95_margin
    }

    #[inline]
    pub fn ci_high(&self) -> f64 {
        self.mean + self.ci95_margin
    }
}

/// Fold-level MAE aggregation for k-fold model comparison: identical
/// mean/std/CI treatment as every other scalar metric.
#[inline]
pub fn fold_mae_stats(fold_maes: &[f64]) -> SampleStats {
    SampleStats::from_samples(fold_maes)
}

// ── Prediction comparison ─────────────────────────────────────────────────────

/// One train's committed prediction vs. what actually happened.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionSample {
    /// Predicted seconds-to-arrival at commit time.
    pub predicted: f64,
    /// The reference estimator's prediction at the same instant, if one was
    /// supplied for the run.
    pub baseline: Option<f64>,
    /// Observed seconds from commit to actual arrival.
    pub actual: f64,
}

/// Mean-absolute-error comparison of the arrival predictor against the
/// physics-only baseline.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionReport {
    /// Trains that both committed a prediction and actually arrived.
    pub n: usize,
    pub mae: f64,
    /// Baseline MAE over the paired subset; `None` when no baseline ran.
    pub baseline_mae: Option<f64>,
    /// `(baseline_mae − mae) / baseline_mae × 100`; positive means the
    /// predictor beat the baseline.
    pub improvement_pct: Option<f64>,
}

/// Score predictions.  Returns `None` when no train completed the
/// commit-then-arrive cycle.
pub fn compare_predictions(samples: &[PredictionSample]) -> Option<PredictionReport> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len();
    let mae = samples
        .iter()
        .map(|s| (s.predicted - s.actual).abs())
        .sum::<f64>()
        / n as f64;

    // Baseline comparison is restricted to the paired subset so both errors
    // cover the same trains.
    let paired: Vec<&PredictionSample> =
        samples.iter().filter(|s| s.baseline.is_some()).collect();
    let (baseline_mae, improvement_pct) = if paired.is_empty() {
        (None, None)
    } else {
        let paired_mae = paired
            .iter()
            .map(|s| (s.predicted - s.actual).abs())
            .sum::<f64>()
            / paired.len() as f64;
        let base = paired
            .iter()
            .map(|s| (s.baseline.unwrap() - s.actual).abs())
            .sum::<f64>()
            / paired.len() as f64;
        let pct = if base > 0.0 {
            Some((base - paired_mae) / base * 100.0)
        } else {
            None
        };
        (Some(base), pct)
    };

    Some(PredictionReport {
        n,
        mae,
        baseline_mae,
        improvement_pct,
    })
}
