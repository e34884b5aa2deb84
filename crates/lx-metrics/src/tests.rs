//! Unit tests for lx-metrics.

use lx_core::{CrossingId, EngineConfig, FuelModel, MetricsConfig, Thresholds, Tick, VehicleId};
use lx_core::CrossingGeometry;

use crate::comfort::comfort_score;
use crate::stats::*;
use crate::tracker::MetricsTracker;
use crate::vehicle::VehicleRecord;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config() -> EngineConfig {
    EngineConfig {
        tick_len_secs: 1.0,
        thresholds: Thresholds {
            stillness_speed: 0.5,
            ..Thresholds::default()
        },
        fuel: FuelModel {
            driving_lps: 0.001,
            idling_lps: 0.0004,
            engine_off_lps: 0.0,
            co2_kg_per_litre: 2.31,
        },
        metrics: MetricsConfig {
            sample_interval_ticks: 10,
            queue_norm: 20.0,
            wait_norm: 120.0,
        },
        crossings: vec![CrossingGeometry {
            id: CrossingId(0),
            rail_position: 1000.0,
            road_position: 500.0,
            sensor_positions: vec![700.0, 800.0, 900.0],
            engine_off_band: 60.0,
            decision_distance: 200.0,
            alternate: None,
        }],
    }
}

fn vehicle(id: u32) -> VehicleRecord {
    VehicleRecord::new(VehicleId(id), Some(CrossingId(0)), 400.0, 13.0, 0.0)
}

// ── SampleStats ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod sample_stats {
    use super::*;

    #[test]
    fn empty_and_single() {
        let empty = SampleStats::from_samples(&[]);
        assert_eq!(empty.n, 0);
        assert_eq!(empty.ci95_margin, 0.0);

        // n = 1: margin defined as 0 rather than raising.
        let one = SampleStats::from_samples(&[7.5]);
        assert_eq!(one.n, 1);
        assert_eq!(one.mean, 7.5);
        assert_eq!(one.std_dev, 0.0);
        assert_eq!(one.ci95_margin, 0.0);
    }

    #[test]
    fn constant_samples_have_zero_margin() {
        let s = SampleStats::from_samples(&[4.0; 12]);
        assert_eq!(s.mean, 4.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.ci95_margin, 0.0);
    }

    #[test]
    fn ten_wait_samples_match_closed_form() {
        // Ten vehicles: mean 5.5, CI from t(0.025, df=9) = 2.262.
        let waits = [0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 10.0, 10.0, 10.0, 10.0];
        let s = SampleStats::from_samples(&waits);
        assert_eq!(s.n, 10);
        assert!((s.mean - 5.5).abs() < 1e-12);

        let var: f64 = 172.5 / 9.0; // Σ(x−x̄)² = 172.5
        let expected_std = var.sqrt();
        assert!((s.std_dev - expected_std).abs() < 1e-12);

        let expected_margin = 2.262 * expected_std / 10f64.sqrt();
        assert!((s.ci95_margin - expected_margin).abs() < 1e-9);
        assert!((s.ci_low() - (5.5 - expected_margin)).abs() < 1e-9);
        assert!((s.ci_high() - (5.5 + expected_margin)).abs() < 1e-9);
    }

    #[test]
    fn t_table_rows() {
        assert_eq!(t_critical_95(0), 0.0);
        assert_eq!(t_critical_95(1), 12.706);
        assert_eq!(t_critical_95(9), 2.262);
        assert_eq!(t_critical_95(30), 2.042);
        assert_eq!(t_critical_95(35), 2.021);
        assert_eq!(t_critical_95(100), 1.980);
        assert_eq!(t_critical_95(10_000), 1.960);
    }

    #[test]
    fn fold_mae_uses_same_aggregation() {
        let maes = [1.0, 2.0, 3.0];
        assert_eq!(fold_mae_stats(&maes), SampleStats::from_samples(&maes));
    }
}

// ── Comfort ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod comfort {
    use super::*;

    #[test]
    fn bounds_hold_for_extreme_inputs() {
        let cfg = config().metrics;
        for &(q, w) in &[
            (0usize, 0.0f64),
            (0, 1e9),
            (10_000, 0.0),
            (10_000, 1e9),
            (3, 45.0),
        ] {
            let c = comfort_score(q, w, &cfg);
            assert!((0.0..=1.0).contains(&c), "comfort {c} out of bounds");
        }
    }

    #[test]
    fn empty_road_is_perfect() {
        assert_eq!(comfort_score(0, 0.0, &config().metrics), 1.0);
    }

    #[test]
    fn saturated_inputs_floor_to_zero() {
        assert_eq!(comfort_score(10_000, 1e9, &config().metrics), 0.0);
    }

    #[test]
    fn weighted_midpoint() {
        // queue 10/20 = 0.5, wait 60/120 = 0.5 → 1 − (0.3 + 0.2) = 0.5.
        let c = comfort_score(10, 60.0, &config().metrics);
        assert!((c - 0.5).abs() < 1e-12);
    }
}

// ── MetricsTracker ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tracking {
    use super::*;

    #[test]
    fn wait_interval_opens_and_closes() {
        let mut tracker = MetricsTracker::new(&config());
        let mut v = vehicle(0);

        tracker.track(&mut v, 450.0, 10.0, 0.0); // driving
        assert!(!v.waiting);
        tracker.track(&mut v, 460.0, 0.1, 1.0); // stops
        assert!(v.waiting);
        assert_eq!(v.wait_start, Some(1.0));
        assert_eq!(v.stops, 1);

        tracker.track(&mut v, 460.0, 0.0, 2.0); // still waiting
        tracker.track(&mut v, 465.0, 5.0, 9.0); // moves off
        assert!(!v.waiting);
        assert_eq!(v.wait_start, None);
        assert!((v.total_wait - 8.0).abs() < 1e-12);
        assert_eq!(tracker.wait_events.len(), 1);
        assert!((tracker.wait_events[0].duration() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn each_stop_counts_once() {
        let mut tracker = MetricsTracker::new(&config());
        let mut v = vehicle(0);
        for (t, speed) in [(0.0, 10.0), (1.0, 0.0), (2.0, 0.0), (3.0, 8.0), (4.0, 0.0), (5.0, 9.0)] {
            tracker.track(&mut v, 460.0, speed, t);
        }
        assert_eq!(v.stops, 2);
        assert_eq!(tracker.wait_events.len(), 2);
    }

    #[test]
    fn fuel_rates_follow_state() {
        let cfg = config();
        let mut tracker = MetricsTracker::new(&cfg);
        let mut v = vehicle(0);

        tracker.track(&mut v, 450.0, 10.0, 0.0); // driving tick
        assert!((v.total_fuel - 0.001).abs() < 1e-12);

        tracker.track(&mut v, 455.0, 0.0, 1.0); // idling tick
        assert!((v.total_fuel - 0.0014).abs() < 1e-12);

        v.engine_off = true;
        tracker.track(&mut v, 455.0, 0.0, 2.0); // engine-off tick: no burn
        assert!((v.total_fuel - 0.0014).abs() < 1e-12);
        assert!((v.engine_off_time - 1.0).abs() < 1e-12);

        // Emissions always track fuel through the CO₂ constant.
        assert!((v.total_emissions - v.total_fuel * 2.31).abs() < 1e-12);
    }

    #[test]
    fn queue_sampling_counts_waiting_vehicles() {
        let cfg = config();
        let mut tracker = MetricsTracker::new(&cfg);
        let mut a = vehicle(0);
        let mut b = vehicle(1);
        let mut c = vehicle(2);
        tracker.track(&mut a, 460.0, 0.0, 5.0);
        tracker.track(&mut b, 462.0, 0.0, 5.0);
        tracker.track(&mut c, 430.0, 12.0, 5.0);

        let sample = tracker.sample_queue([&a, &b, &c].into_iter(), 10.0);
        assert_eq!(sample.queue_len, 2);
        assert!((0.0..=1.0).contains(&sample.comfort));
        assert_eq!(tracker.queue_samples.len(), 1);
    }

    #[test]
    fn sampling_interval() {
        let tracker = MetricsTracker::new(&config());
        assert!(tracker.should_sample(Tick(0)));
        assert!(!tracker.should_sample(Tick(7)));
        assert!(tracker.should_sample(Tick(20)));
    }

    #[test]
    fn finalize_closes_open_waits_at_last_seen() {
        let cfg = config();
        let mut tracker = MetricsTracker::new(&cfg);
        let mut v = vehicle(0);
        tracker.track(&mut v, 460.0, 0.0, 3.0); // starts waiting, never resumes
        tracker.track(&mut v, 460.0, 0.0, 10.0);

        let report = tracker.finalize(vec![v], &[]);
        assert_eq!(report.vehicle_count, 1);
        assert_eq!(report.wait_events.len(), 1);
        assert!((report.wait.mean - 7.0).abs() < 1e-12); // 3.0 → 10.0
        assert_eq!(report.total_stops, 1);
    }

    #[test]
    fn finalize_with_no_samples_reports_perfect_comfort() {
        let report = MetricsTracker::new(&config()).finalize(vec![], &[]);
        assert_eq!(report.final_comfort, 1.0);
        assert_eq!(report.queue.max_len, 0);
        assert!(report.prediction.is_none());
    }
}

// ── Prediction comparison ─────────────────────────────────────────────────────

#[cfg(test)]
mod predictions {
    use super::*;

    #[test]
    fn mae_and_improvement() {
        let samples = [
            PredictionSample { predicted: 10.0, baseline: Some(14.0), actual: 11.0 },
            PredictionSample { predicted: 20.0, baseline: Some(26.0), actual: 21.0 },
        ];
        let r = compare_predictions(&samples).unwrap();
        assert_eq!(r.n, 2);
        assert!((r.mae - 1.0).abs() < 1e-12);
        assert!((r.baseline_mae.unwrap() - 4.0).abs() < 1e-12);
        assert!((r.improvement_pct.unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn no_baseline_still_scores_mae() {
        let samples = [PredictionSample { predicted: 5.0, baseline: None, actual: 7.0 }];
        let r = compare_predictions(&samples).unwrap();
        assert!((r.mae - 2.0).abs() < 1e-12);
        assert!(r.baseline_mae.is_none());
        assert!(r.improvement_pct.is_none());
    }

    #[test]
    fn empty_is_none() {
        assert!(compare_predictions(&[]).is_none());
    }
}
