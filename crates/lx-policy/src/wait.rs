//! Expected-remaining-wait estimation, shared by both policies.

use lx_core::Thresholds;
use lx_track::Train;

/// How long a vehicle queued at the crossing can expect to keep waiting.
///
/// Takes the *nearest* tracked train — the one with the smallest remaining
/// ETA — and adds the reopening lead time to its remaining clearance time
/// (remaining ETD, floored at zero once the rear is overdue).  Trains without
/// an estimate, or already departed, contribute nothing; with no candidate at
/// all the answer is `None` and callers defer.
pub fn expected_remaining_wait<'a>(
    trains: impl IntoIterator<Item = &'a Train>,
    th: &Thresholds,
    now: f64,
) -> Option<f64> {
    let nearest = trains
        .into_iter()
        .filter(|t| !t.departed && t.estimate.is_some())
        .min_by(|a, b| {
            let ra = a.remaining_eta(now).unwrap_or(f64::INFINITY);
            let rb = b.remaining_eta(now).unwrap_or(f64::INFINITY);
            ra.total_cmp(&rb)
        })?;
    let clearance = nearest.remaining_etd(now).unwrap_or(0.0).max(0.0);
    Some(clearance + th.opening_after_etd)
}
