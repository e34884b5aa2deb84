//! The bounded comfort heuristic.

use lx_core::MetricsConfig;

/// Comfort score in `[0, 1]`, higher is better:
///
/// `1 − (0.6·min(queue/Q_norm, 1) + 0.4·min(avg_wait/W_norm, 1))`
///
/// Both terms saturate at 1, so the score is bounded for any input.
pub fn comfort_score(queue_len: usize, avg_wait: f64, cfg: &MetricsConfig) -> f64 {
    let queue_term = (queue_len as f64 / cfg.queue_norm).min(1.0);
    let wait_term = (avg_wait.max(0.0) / cfg.wait_norm).min(1.0);
    (1.0 - (0.6 * queue_term + 0.4 * wait_term)).clamp(0.0, 1.0)
}
