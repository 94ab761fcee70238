//! Per-device state tracking

use std::sync::atomic::{AtomicU64, Ordering};

use super::spec::DeviceSpec;

/// Counters for one decoder instance
#[derive(Debug, Default)]
pub struct DeviceStats {
    pub captures_received: AtomicU64,
    pub readings_emitted: AtomicU64,
    pub empty_captures: AtomicU64,
    pub malformed_captures: AtomicU64,
}

impl DeviceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_capture(&self) {
        self.captures_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_readings(&self, count: usize) {
        self.readings_emitted.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_empty(&self) {
        self.empty_captures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed_captures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_captures(&self) -> u64 {
        self.captures_received.load(Ordering::Relaxed)
    }

    pub fn get_readings(&self) -> u64 {
        self.readings_emitted.load(Ordering::Relaxed)
    }

    pub fn get_empty(&self) -> u64 {
        self.empty_captures.load(Ordering::Relaxed)
    }

    pub fn get_malformed(&self) -> u64 {
        self.malformed_captures.load(Ordering::Relaxed)
    }
}

/// State for a single registered decoder
pub struct DeviceState {
    pub spec: &'static DeviceSpec,
    pub stats: DeviceStats,
    pub running: bool,
}

impl DeviceState {
    pub fn new(spec: &'static DeviceSpec) -> Self {
        Self {
            spec,
            stats: DeviceStats::new(),
            running: false,
        }
    }
}
