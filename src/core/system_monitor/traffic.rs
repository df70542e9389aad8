//! Network rate calculation from successive counter snapshots.
//!
//! Every call to [`TrafficMonitor::record`] compares the new counters with the
//! previous ones, derives receive/transmit rates in megabits per second and
//! appends them to a per-interface history used by the traffic graphs.

use super::history::{HistoryStore, TRAFFIC_HISTORY_CAPACITY};
use super::metrics::NetworkUsage;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Back-to-back samples closer than this are treated as this far apart
pub const MIN_ELAPSED_SECS: f64 = 0.1;

/// Raw monotonic counters for one interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub packets_received: u64,
    pub packets_sent: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    pub rx_mbps: f64,
    pub tx_mbps: f64,
    pub timestamp: DateTime<Local>,
}

pub fn clamp_elapsed(elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_nan() || elapsed_secs < MIN_ELAPSED_SECS {
        MIN_ELAPSED_SECS
    } else {
        elapsed_secs
    }
}

/// Megabits per second between two byte counters.
///
/// A counter that went backwards (interface restart, wrap) yields `0.0`.
pub fn rate_mbps(previous: u64, current: u64, elapsed_secs: f64) -> f64 {
    let delta = current.saturating_sub(previous) as f64;
    (delta / clamp_elapsed(elapsed_secs)) * 8.0 / 1_000_000.0
}

struct TrafficState {
    last_readings: HashMap<String, CounterSnapshot>,
    last_read_time: Instant,
    history: HistoryStore<RateSample>,
}

pub struct TrafficMonitor {
    state: Mutex<TrafficState>,
}

impl Default for TrafficMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficMonitor {
    pub fn new() -> Self {
        Self::with_history_capacity(TRAFFIC_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(TrafficState {
                last_readings: HashMap::new(),
                last_read_time: Instant::now(),
                history: HistoryStore::with_capacity(capacity),
            }),
        }
    }

    pub fn record(&self, current: HashMap<String, CounterSnapshot>) -> Vec<NetworkUsage> {
        self.record_at(current, Instant::now())
    }

    /// Derive rates for `current` as observed at `now`.
    ///
    /// Interfaces seen for the first time report zero rates and only become
    /// the baseline for the next call. The previous-reading cache is replaced
    /// wholesale, so interfaces that vanished are forgotten.
    pub fn record_at(
        &self,
        current: HashMap<String, CounterSnapshot>,
        now: Instant,
    ) -> Vec<NetworkUsage> {
        let mut state = self.state.lock();
        let elapsed = now
            .saturating_duration_since(state.last_read_time)
            .as_secs_f64();
        let timestamp = Local::now();

        let mut usage: Vec<NetworkUsage> = Vec::with_capacity(current.len());
        for (name, counters) in &current {
            let mut entry = NetworkUsage {
                interface: name.clone(),
                bytes_received: counters.bytes_received,
                bytes_sent: counters.bytes_sent,
                packets_received: counters.packets_received,
                packets_sent: counters.packets_sent,
                errors: counters.errors,
                timestamp: Some(timestamp),
                ..Default::default()
            };

            if let Some(prev) = state.last_readings.get(name) {
                entry.rx_rate_mbps = rate_mbps(prev.bytes_received, counters.bytes_received, elapsed);
                entry.tx_rate_mbps = rate_mbps(prev.bytes_sent, counters.bytes_sent, elapsed);
                state.history.push(
                    name,
                    RateSample {
                        rx_mbps: entry.rx_rate_mbps,
                        tx_mbps: entry.tx_rate_mbps,
                        timestamp,
                    },
                );
            } else {
                log::debug!("traffic baseline recorded for {}", name);
            }

            usage.push(entry);
        }

        state.last_readings = current;
        state.last_read_time = now;

        usage.sort_by(|a, b| a.interface.cmp(&b.interface));
        usage
    }

    /// Receive and transmit rate series for `interface`, oldest first
    pub fn history(&self, interface: &str) -> (Vec<f64>, Vec<f64>) {
        let state = self.state.lock();
        let samples = state.history.snapshot(interface);
        samples.iter().map(|s| (s.rx_mbps, s.tx_mbps)).unzip()
    }

    pub fn rate_history(&self, interface: &str) -> Vec<RateSample> {
        self.state.lock().history.snapshot(interface)
    }

    pub fn tracked_interfaces(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut names: Vec<String> = state.last_readings.keys().cloned().collect();
        names.sort();
        names
    }
}
