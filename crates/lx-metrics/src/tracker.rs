//! Per-tick metrics accounting and periodic queue sampling.

use lx_core::{EngineConfig, FuelModel, MetricsConfig, Tick, VehicleId};

use crate::comfort::comfort_score;
use crate::report::{MetricsReport, QueueStats};
use crate::stats::{compare_predictions, PredictionSample, SampleStats};
use crate::vehicle::VehicleRecord;

/// One completed wait interval.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaitEvent {
    pub vehicle: VehicleId,
    pub start: f64,
    pub end: f64,
}

impl WaitEvent {
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One periodic queue observation.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueSample {
    pub time: f64,
    /// Vehicles currently waiting.
    pub queue_len: usize,
    /// Comfort score at this instant.
    pub comfort: f64,
}

/// Accumulates the per-vehicle and queue-level metrics across a run.
pub struct MetricsTracker {
    fuel: FuelModel,
    cfg: MetricsConfig,
    stillness_speed: f64,
    tick_len_secs: f64,
    pub wait_events: Vec<WaitEvent>,
    pub queue_samples: Vec<QueueSample>,
}

impl MetricsTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            fuel: config.fuel.clone(),
            cfg: config.metrics.clone(),
            stillness_speed: config.thresholds.stillness_speed,
            tick_len_secs: config.tick_len_secs,
            wait_events: Vec::new(),
            queue_samples: Vec::new(),
        }
    }

    /// Apply one tick's observation of `vehicle`.
    ///
    /// Handles the waiting-state transition (opening/closing wait intervals),
    /// then accrues fuel, emissions, and engine-off time for the tick using
    /// the per-state rate table.
    pub fn track(&mut self, vehicle: &mut VehicleRecord, position: f64, speed: f64, now: f64) {
        let waiting_now = speed < self.stillness_speed;

        if waiting_now && !vehicle.waiting {
            vehicle.wait_start = Some(now);
            vehicle.stops += 1;
        }
        if !waiting_now && vehicle.waiting {
            if let Some(start) = vehicle.wait_start.take() {
                self.close_wait(vehicle, start, now);
            }
        }
        vehicle.waiting = waiting_now;

        let rate = if vehicle.engine_off {
            self.fuel.engine_off_lps
        } else if waiting_now {
            self.fuel.idling_lps
        } else {
            self.fuel.driving_lps
        };
        let litres = rate * self.tick_len_secs;
        vehicle.total_fuel += litres;
        vehicle.total_emissions += litres * self.fuel.co2_kg_per_litre;
        if vehicle.engine_off {
            vehicle.engine_off_time += self.tick_len_secs;
        }

        vehicle.last_seen = now;
        vehicle.last_position = position;
        vehicle.last_speed = speed;
    }

    /// Is `tick` a queue-sampling tick?
    #[inline]
    pub fn should_sample(&self, tick: Tick) -> bool {
        tick.0.is_multiple_of(self.cfg.sample_interval_ticks)
    }

    /// Take a queue-length/comfort sample over all known vehicles.
    pub fn sample_queue<'a>(
        &mut self,
        vehicles: impl Iterator<Item = &'a VehicleRecord>,
        now: f64,
    ) -> QueueSample {
        let mut queue_len = 0usize;
        let mut total_wait = 0.0;
        let mut count = 0usize;
        for v in vehicles {
            if v.waiting {
                queue_len += 1;
            }
            total_wait += v.wait_including_open(now);
            count += 1;
        }
        let avg_wait = if count > 0 {
            total_wait / count as f64
        } else {
            0.0
        };
        let sample = QueueSample {
            time: now,
            queue_len,
            comfort: comfort_score(queue_len, avg_wait, &self.cfg),
        };
        self.queue_samples.push(sample);
        sample
    }

    /// Produce the final report.  Open wait intervals are closed at each
    /// vehicle's `last_seen` time so vanished vehicles still contribute.
    pub fn finalize(
        mut self,
        mut vehicles: Vec<VehicleRecord>,
        predictions: &[PredictionSample],
    ) -> MetricsReport {
        for v in &mut vehicles {
            if let Some(start) = v.wait_start.take() {
                let end = v.last_seen;
                self.close_wait(v, start, end);
                v.waiting = false;
            }
        }

        let waits: Vec<f64> = vehicles.iter().map(|v| v.total_wait).collect();
        let fuels: Vec<f64> = vehicles.iter().map(|v| v.total_fuel).collect();
        let emissions: Vec<f64> = vehicles.iter().map(|v| v.total_emissions).collect();
        let comforts: Vec<f64> = self.queue_samples.iter().map(|s| s.comfort).collect();

        let comfort = SampleStats::from_samples(&comforts);
        let final_comfort = if comfort.n > 0 { comfort.mean } else { 1.0 };

        let queue = QueueStats {
            samples: self.queue_samples.len(),
            mean_len: if self.queue_samples.is_empty() {
                0.0
            } else {
                self.queue_samples.iter().map(|s| s.queue_len as f64).sum::<f64>()
                    / self.queue_samples.len() as f64
            },
            max_len: self.queue_samples.iter().map(|s| s.queue_len).max().unwrap_or(0),
        };

        MetricsReport {
            vehicle_count: vehicles.len(),
            wait: SampleStats::from_samples(&waits),
            fuel: SampleStats::from_samples(&fuels),
            emissions: SampleStats::from_samples(&emissions),
            comfort,
            final_comfort,
            queue,
            total_engine_off_time: vehicles.iter().map(|v| v.engine_off_time).sum(),
            total_stops: vehicles.iter().map(|v| u64::from(v.stops)).sum(),
            wait_events: self.wait_events,
            queue_samples: self.queue_samples,
            prediction: compare_predictions(predictions),
        }
    }

    fn close_wait(&mut self, vehicle: &mut VehicleRecord, start: f64, end: f64) {
        let duration = (end - start).max(0.0);
        vehicle.total_wait += duration;
        self.wait_events.push(WaitEvent {
            vehicle: vehicle.id,
            start,
            end,
        });
    }
}
