//! Device manager - feeds captures through the decoder into the sink

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::bitbuffer::Capture;
use crate::hg01::Hg01Decoder;
use crate::output::ReadingSink;

use super::state::DeviceState;

/// Device manager coordinates the capture channel, decoder and sink
pub struct DeviceManager<S: ReadingSink> {
    decoder: Hg01Decoder,
    device_state: DeviceState,
    sink: S,
    stats_interval: Duration,
}

impl<S: ReadingSink> DeviceManager<S> {
    pub fn new(sink: S, stats_interval: Duration) -> Self {
        let decoder = Hg01Decoder::new();
        let device_state = DeviceState::new(decoder.spec());

        Self {
            decoder,
            device_state,
            sink,
            stats_interval: stats_interval.max(Duration::from_secs(1)),
        }
    }

    /// Run until the capture channel closes
    pub async fn run(&mut self, mut capture_rx: mpsc::Receiver<Capture>) -> Result<()> {
        info!("Starting device manager for {}", self.device_state.spec.name);
        self.device_state.running = true;

        let mut stats_interval = tokio::time::interval(self.stats_interval);
        // First tick completes immediately
        stats_interval.tick().await;
        let mut readings_since_log = 0u64;

        loop {
            tokio::select! {
                capture = capture_rx.recv() => {
                    match capture {
                        Some(capture) => {
                            readings_since_log += self.process_capture(&capture) as u64;
                        }
                        None => {
                            info!("Capture channel closed");
                            break;
                        }
                    }
                }
                _ = stats_interval.tick() => {
                    info!(
                        "[Stats] Readings: {} | Total readings: {} | Captures: {} | Empty: {} | Malformed: {}",
                        readings_since_log,
                        self.device_state.stats.get_readings(),
                        self.device_state.stats.get_captures(),
                        self.device_state.stats.get_empty(),
                        self.device_state.stats.get_malformed()
                    );
                    readings_since_log = 0;
                }
            }
        }

        self.device_state.running = false;

        let decoder_stats = self.decoder.get_stats();
        info!(
            "Device manager stopped. Captures: {}, Rows: {}, Short rows: {}, Preambles: {}, Readings: {}",
            self.device_state.stats.get_captures(),
            decoder_stats.rows_scanned,
            decoder_stats.short_rows,
            decoder_stats.preambles_found,
            self.device_state.stats.get_readings(),
        );

        Ok(())
    }

    /// Scan one capture, returning the number of readings emitted
    pub fn process_capture(&mut self, capture: &Capture) -> usize {
        self.device_state.stats.record_capture();

        match self.decoder.scan(capture, &mut self.sink) {
            Ok(0) => {
                self.device_state.stats.record_empty();
                trace!("No HG01 message in capture of {} rows", capture.num_rows());
                0
            }
            Ok(count) => {
                self.device_state.stats.record_readings(count);
                debug!("Decoded {} HG01 reading(s)", count);
                count
            }
            Err(e) => {
                self.device_state.stats.record_malformed();
                debug!("HG01 preamble found but message malformed: {}", e);
                0
            }
        }
    }

    pub fn device_state(&self) -> &DeviceState {
        &self.device_state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hg01::Reading;

    fn capture(s: &str) -> Capture {
        s.parse().unwrap()
    }

    #[test]
    fn test_process_capture_counts() {
        let mut manager = DeviceManager::new(Vec::<Reading>::new(), Duration::from_secs(60));

        assert_eq!(manager.process_capture(&capture("{65}55aadec3d2eb9b8f80")), 1);
        assert_eq!(manager.process_capture(&capture("{40}0000000000")), 0);

        let stats = &manager.device_state().stats;
        assert_eq!(stats.get_captures(), 2);
        assert_eq!(stats.get_readings(), 1);
        assert_eq!(stats.get_empty(), 1);
        assert_eq!(stats.get_malformed(), 0);
        assert_eq!(manager.sink().len(), 1);
    }

    #[tokio::test]
    async fn test_run_drains_channel() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(capture("{65}55aadec3d2eb9b8f80/{65}55aadec3d2eb9b8f80"))
            .await
            .unwrap();
        tx.send(capture("{8}ff")).await.unwrap();
        drop(tx);

        let mut manager = DeviceManager::new(Vec::<Reading>::new(), Duration::from_secs(60));
        manager.run(rx).await.unwrap();

        assert!(!manager.device_state().running);
        assert_eq!(manager.device_state().stats.get_captures(), 2);

        let readings = manager.into_sink();
        assert_eq!(readings.len(), 2);
        assert!(readings.iter().all(|r| r.id == "3c" && r.soil_moisture == 45));
    }
}
