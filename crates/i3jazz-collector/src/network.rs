use crate::delta::DeltaTracker;
use crate::units::format_bytes;
use crate::Collector;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use sysinfo::Networks;

/// Receive/transmit throughput of one interface, averaged over the time that
/// actually passed since the previous sample.
pub struct NetworkCollector {
    networks: Networks,
    interface: String,
    /// Nominal tick, used only until a second sample gives a measured span.
    interval: Duration,
    tracker: DeltaTracker,
    last_sample: Option<Instant>,
}

impl NetworkCollector {
    pub fn new(interface: impl Into<String>, interval: Duration) -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            interface: interface.into(),
            interval,
            tracker: DeltaTracker::new(),
            last_sample: None,
        }
    }

    /// Folds cumulative counters taken at `at` into a rate line.
    fn sample(&mut self, received: u64, transmitted: u64, at: Instant) -> String {
        let elapsed = self
            .last_sample
            .map_or(self.interval, |previous| at.saturating_duration_since(previous));
        self.last_sample = Some(at);

        let (rx_delta, tx_delta) = self.tracker.advance(received, transmitted);
        format_rate(rx_delta, tx_delta, elapsed)
    }
}

fn format_rate(rx_delta: u64, tx_delta: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    format!(
        "Net: {} Rx, {} Tx",
        format_bytes(rx_delta as f64 / secs),
        format_bytes(tx_delta as f64 / secs)
    )
}

#[async_trait]
impl Collector for NetworkCollector {
    fn name(&self) -> &str {
        "network"
    }

    async fn collect(&mut self) -> Result<String> {
        self.networks.refresh();
        let (received, transmitted) = self
            .networks
            .iter()
            .find(|(name, _)| name.as_str() == self.interface)
            .map(|(_, data)| (data.total_received(), data.total_transmitted()))
            .ok_or_else(|| anyhow!("interface {} not found", self.interface))?;

        Ok(self.sample(received, transmitted, Instant::now()))
    }

    fn fallback(&self) -> String {
        format_rate(0, 0, self.interval)
    }
}
